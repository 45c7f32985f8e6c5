//! Hardware transport over `midir`.
//!
//! Each endpoint is an input/output port pair. The input callback runs on the
//! backend's thread; it reassembles SysEx and hands complete messages to the
//! poll loop through a bounded channel, dropping them when the loop falls
//! behind.

use super::{EndpointId, EndpointInfo, InboundSysex, SysexTransport};
use crate::config::EditorConfig;
use crate::{Error, Result};
use arc_swap::ArcSwap;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::sync::Arc;
use synthlink_core::sysex::{SYSEX_END, SYSEX_START};
use tracing::{debug, info, warn};

/// An available MIDI port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

struct Connection {
    id: EndpointId,
    _input: MidiInputConnection<()>,
    output: MidiOutputConnection,
}

pub struct MidirTransport {
    client_name: String,
    max_inbound_len: usize,
    inbox_tx: Sender<InboundSysex>,
    inbox_rx: Receiver<InboundSysex>,
    connections: Vec<Connection>,
    connected: Arc<ArcSwap<Vec<EndpointInfo>>>,
    next_id: u32,
}

impl MidirTransport {
    pub fn new(config: &EditorConfig) -> Result<Self> {
        config.validate()?;
        let (inbox_tx, inbox_rx) = bounded(config.inbox_capacity);
        Ok(Self {
            client_name: config.client_name.clone(),
            max_inbound_len: config.max_inbound_len,
            inbox_tx,
            inbox_rx,
            connections: Vec::new(),
            connected: Arc::new(ArcSwap::from_pointee(Vec::new())),
            next_id: 0,
        })
    }

    pub fn list_inputs(client_name: &str) -> Vec<MidiPortInfo> {
        let mut ports = Vec::new();
        if let Ok(midi_input) = MidiInput::new(client_name) {
            for (index, port) in midi_input.ports().iter().enumerate() {
                let name = midi_input
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index));
                ports.push(MidiPortInfo { index, name });
            }
        }
        ports
    }

    pub fn list_outputs(client_name: &str) -> Vec<MidiPortInfo> {
        let mut ports = Vec::new();
        if let Ok(midi_output) = MidiOutput::new(client_name) {
            for (index, port) in midi_output.ports().iter().enumerate() {
                let name = midi_output
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index));
                ports.push(MidiPortInfo { index, name });
            }
        }
        ports
    }

    /// Open input `input_index` and output `output_index` as one endpoint.
    pub fn connect(&mut self, input_index: usize, output_index: usize) -> Result<EndpointId> {
        let id = EndpointId(self.next_id);

        let mut midi_input = MidiInput::new(&self.client_name)?;
        midi_input.ignore(Ignore::None);
        let in_ports = midi_input.ports();
        let in_port = in_ports.get(input_index).ok_or_else(|| {
            Error::MidiDevice(format!("MIDI input device {} not found", input_index))
        })?;
        let in_name = midi_input
            .port_name(in_port)
            .unwrap_or_else(|_| format!("Device {}", input_index));

        let midi_output = MidiOutput::new(&self.client_name)?;
        let out_ports = midi_output.ports();
        let out_port = out_ports.get(output_index).ok_or_else(|| {
            Error::MidiDevice(format!("MIDI output device {} not found", output_index))
        })?;
        let output = midi_output.connect(out_port, &format!("{}-out", self.client_name))?;

        let mut assembler = SysexAssembler::new(self.max_inbound_len);
        let inbox = self.inbox_tx.clone();
        let input = midi_input.connect(
            in_port,
            &format!("{}-in", self.client_name),
            move |_timestamp, message, _| {
                if let Some(bytes) = assembler.push(message) {
                    match inbox.try_send(InboundSysex {
                        endpoint: id,
                        bytes,
                    }) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            debug!("SysEx inbox full, dropping message");
                        }
                        Err(TrySendError::Disconnected(_)) => {}
                    }
                }
            },
            (),
        )?;

        self.next_id += 1;
        self.connections.push(Connection {
            id,
            _input: input,
            output,
        });
        self.connected.rcu(|current| {
            let mut list = Vec::clone(current);
            list.push(EndpointInfo {
                id,
                name: in_name.clone(),
            });
            list
        });
        info!("Connected MIDI endpoint {id} ({in_name})");
        Ok(id)
    }

    /// Connect the first input and output whose names contain `name`,
    /// case-insensitively.
    pub fn connect_by_name(&mut self, name: &str) -> Result<EndpointId> {
        let needle = name.to_lowercase();
        let find = |ports: Vec<MidiPortInfo>, kind: &str| {
            ports
                .into_iter()
                .find(|p| p.name.to_lowercase().contains(&needle))
                .map(|p| p.index)
                .ok_or_else(|| {
                    Error::MidiDevice(format!("No MIDI {kind} device found matching '{name}'"))
                })
        };
        let input = find(Self::list_inputs(&self.client_name), "input")?;
        let output = find(Self::list_outputs(&self.client_name), "output")?;
        self.connect(input, output)
    }

    pub fn disconnect(&mut self, endpoint: EndpointId) -> Result<()> {
        let position = self
            .connections
            .iter()
            .position(|c| c.id == endpoint)
            .ok_or(Error::UnknownEndpoint(endpoint))?;
        let connection = self.connections.remove(position);
        let _ = connection.output.close();
        self.connected.rcu(|current| {
            current
                .iter()
                .filter(|e| e.id != endpoint)
                .cloned()
                .collect::<Vec<_>>()
        });
        info!("Disconnected MIDI endpoint {endpoint}");
        Ok(())
    }

    /// Connected endpoints, readable from other threads.
    pub fn connected(&self) -> Arc<ArcSwap<Vec<EndpointInfo>>> {
        Arc::clone(&self.connected)
    }
}

impl SysexTransport for MidirTransport {
    fn poll(&mut self) -> Vec<InboundSysex> {
        self.inbox_rx.try_iter().collect()
    }

    fn send(&mut self, endpoint: EndpointId, bytes: &[u8]) -> Result<()> {
        let connection = self
            .connections
            .iter_mut()
            .find(|c| c.id == endpoint)
            .ok_or(Error::UnknownEndpoint(endpoint))?;
        connection.output.send(bytes)?;
        Ok(())
    }

    fn endpoints(&self) -> Vec<EndpointInfo> {
        self.connected.load().as_ref().clone()
    }
}

/// Joins SysEx that a backend delivers in several chunks, and drops
/// everything else.
struct SysexAssembler {
    buffer: Vec<u8>,
    in_sysex: bool,
    overflow: bool,
    max_len: usize,
}

impl SysexAssembler {
    fn new(max_len: usize) -> Self {
        Self {
            buffer: Vec::new(),
            in_sysex: false,
            overflow: false,
            max_len,
        }
    }

    fn push(&mut self, chunk: &[u8]) -> Option<Vec<u8>> {
        match chunk.first() {
            Some(&SYSEX_START) => {
                self.buffer.clear();
                self.in_sysex = true;
                self.overflow = false;
            }
            Some(&b) if self.in_sysex && b < 0x80 => {}
            _ => {
                // Channel and system messages; realtime bytes would not
                // arrive as their own chunk mid-SysEx.
                self.in_sysex = false;
                return None;
            }
        }

        if !self.overflow {
            if self.buffer.len() + chunk.len() > self.max_len {
                warn!("Dropping inbound SysEx longer than {} bytes", self.max_len);
                self.overflow = true;
                self.buffer.clear();
            } else {
                self.buffer.extend_from_slice(chunk);
            }
        }

        if chunk.last() == Some(&SYSEX_END) {
            self.in_sysex = false;
            if self.overflow {
                return None;
            }
            return Some(std::mem::take(&mut self.buffer));
        }
        None
    }
}
