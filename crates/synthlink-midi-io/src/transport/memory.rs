//! In-process transport for tests and offline tooling.
//!
//! Inbound traffic is injected through a cloneable [`MemoryHandle`]; every
//! frame the editor sends is captured so it can be inspected afterwards.

use super::{EndpointId, EndpointInfo, InboundSysex, SysexTransport};
use crate::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;

type SentLog = Arc<Mutex<Vec<(EndpointId, Vec<u8>)>>>;

pub struct MemoryTransport {
    endpoints: Vec<EndpointInfo>,
    inbound: Receiver<InboundSysex>,
    handle: MemoryHandle,
}

/// Injects inbound SysEx and reads back what was sent.
#[derive(Clone)]
pub struct MemoryHandle {
    inbound: Sender<InboundSysex>,
    sent: SentLog,
}

impl MemoryTransport {
    /// A transport whose inbound queue holds at most `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        Self {
            endpoints: Vec::new(),
            inbound: rx,
            handle: MemoryHandle {
                inbound: tx,
                sent: Arc::new(Mutex::new(Vec::new())),
            },
        }
    }

    pub fn add_endpoint(&mut self, name: impl Into<String>) -> EndpointId {
        let id = EndpointId(self.endpoints.len() as u32);
        self.endpoints.push(EndpointInfo {
            id,
            name: name.into(),
        });
        id
    }

    pub fn handle(&self) -> MemoryHandle {
        self.handle.clone()
    }
}

impl SysexTransport for MemoryTransport {
    fn poll(&mut self) -> Vec<InboundSysex> {
        self.inbound.try_iter().collect()
    }

    fn send(&mut self, endpoint: EndpointId, bytes: &[u8]) -> Result<()> {
        if !self.endpoints.iter().any(|e| e.id == endpoint) {
            return Err(Error::UnknownEndpoint(endpoint));
        }
        self.handle.sent.lock().push((endpoint, bytes.to_vec()));
        Ok(())
    }

    fn endpoints(&self) -> Vec<EndpointInfo> {
        self.endpoints.clone()
    }
}

impl MemoryHandle {
    /// Queue `bytes` as if received on `endpoint`. Returns false when the
    /// queue is full and the message was dropped.
    pub fn inject(&self, endpoint: EndpointId, bytes: &[u8]) -> bool {
        match self.inbound.try_send(InboundSysex {
            endpoint,
            bytes: bytes.to_vec(),
        }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Memory transport inbox full, dropping SysEx");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Every frame sent so far, oldest first.
    pub fn sent(&self) -> Vec<(EndpointId, Vec<u8>)> {
        self.sent.lock().clone()
    }

    /// Like [`sent`](Self::sent), but clears the log.
    pub fn take_sent(&self) -> Vec<(EndpointId, Vec<u8>)> {
        std::mem::take(&mut *self.sent.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_and_poll() {
        let mut transport = MemoryTransport::new(4);
        let a = transport.add_endpoint("A");
        let handle = transport.handle();

        assert!(handle.inject(a, &[0xf0, 0xf7]));
        let inbound = transport.poll();
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].endpoint, a);
        assert!(transport.poll().is_empty());
    }

    #[test]
    fn test_full_inbox_drops() {
        let mut transport = MemoryTransport::new(1);
        let a = transport.add_endpoint("A");
        let handle = transport.handle();
        assert!(handle.inject(a, &[0xf0, 0xf7]));
        assert!(!handle.inject(a, &[0xf0, 0x00, 0xf7]));
        assert_eq!(transport.poll().len(), 1);
    }

    #[test]
    fn test_send_and_broadcast() {
        let mut transport = MemoryTransport::new(4);
        let a = transport.add_endpoint("A");
        let b = transport.add_endpoint("B");
        let handle = transport.handle();

        transport.send(b, &[1]).unwrap();
        transport.broadcast(&[2]).unwrap();
        assert_eq!(
            handle.take_sent(),
            vec![(b, vec![1]), (a, vec![2]), (b, vec![2])]
        );
        assert!(handle.sent().is_empty());

        assert!(matches!(
            transport.send(EndpointId(9), &[1]),
            Err(Error::UnknownEndpoint(EndpointId(9)))
        ));
    }
}
