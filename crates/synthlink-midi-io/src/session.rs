//! One identified device on one endpoint.
//!
//! A session never touches the transport. Requests return the frames to
//! send and the [`SessionManager`](crate::SessionManager) sends them, so every
//! state change happens inside a call on the poll-loop thread.

use crate::transport::EndpointId;
use crate::Result;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use synthlink_core::sysex::Decoded;
use synthlink_core::{IdentityResponse, ParameterInstance, SyncPolicy, WriteReport};
use synthlink_devices::DeviceProfile;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Matched to a profile; parameter tree not built yet.
    Identifying,
    /// Live. Reads and writes are fire-and-forget, so there is no separate
    /// in-flight state.
    Bound,
    /// The endpoint went away.
    Closed,
}

/// What a session did with an inbound buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysexOutcome {
    /// Data stored into the instance.
    Applied(WriteReport),
    /// Another identity response from the device this session is bound to.
    DuplicateIdentity,
    /// Addressed to this session but unusable.
    Discarded,
    /// Not for this session; offer it elsewhere.
    NotClaimed,
}

impl SysexOutcome {
    pub fn is_claimed(&self) -> bool {
        !matches!(self, SysexOutcome::NotClaimed)
    }
}

pub struct DeviceSession {
    id: SessionId,
    profile: Arc<DeviceProfile>,
    endpoint: EndpointId,
    channel: u8,
    state: SessionState,
    instance: Option<ParameterInstance>,
    prefix: String,
}

impl DeviceSession {
    /// A session in [`SessionState::Identifying`]; call [`bind`](Self::bind)
    /// to materialize its parameters.
    pub fn new(id: SessionId, profile: Arc<DeviceProfile>, endpoint: EndpointId, channel: u8) -> Self {
        let prefix = profile.log_prefix(channel);
        Self {
            id,
            profile,
            endpoint,
            channel,
            state: SessionState::Identifying,
            instance: None,
            prefix,
        }
    }

    /// Build the live parameter tree from the profile's schema. Profiles
    /// without a schema bind with no instance.
    pub fn bind(&mut self) {
        if self.state != SessionState::Identifying {
            return;
        }
        self.instance = self.profile.schema().map(|schema| schema.instantiate());
        self.state = SessionState::Bound;
        match &self.instance {
            Some(instance) => debug!(
                "{}Bound on {}, {} bytes of parameter memory",
                self.prefix,
                self.endpoint,
                instance.root().length()
            ),
            None => debug!("{}Bound on {} without a parameter map", self.prefix, self.endpoint),
        }
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn profile(&self) -> &Arc<DeviceProfile> {
        &self.profile
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.profile.name()
    }

    #[inline]
    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.state == SessionState::Bound
    }

    pub fn instance(&self) -> Option<&ParameterInstance> {
        self.instance.as_ref()
    }

    /// Mutable access for observer registration and local edits. Local edits
    /// reach the device only through [`request_write`](Self::request_write).
    pub fn instance_mut(&mut self) -> Option<&mut ParameterInstance> {
        self.instance.as_mut()
    }

    /// Effective sync policy for the region containing `address`.
    pub fn policy_at(&self, address: u32) -> SyncPolicy {
        self.instance
            .as_ref()
            .and_then(|instance| instance.sync_override(address))
            .unwrap_or_else(|| self.profile.sync_policy())
    }

    /// Pacing hint of the nearest enclosing node that declares one.
    pub fn request_delay(&self, address: u32) -> Option<Duration> {
        self.instance
            .as_ref()?
            .root()
            .path_to(address)?
            .into_iter()
            .rev()
            .find_map(|node| node.meta().request_delay)
    }

    // ==================== Requests ====================

    /// Read requests for `start..start + length`, limited to the regions
    /// whose policy allows reading on demand.
    pub fn request_read(&self, start: u32, length: u32) -> Result<Vec<Vec<u8>>> {
        let spans = self.readable_spans(start, length);
        if spans.is_empty() {
            debug!("{}Skipping read of {start:08x}: not random access", self.prefix);
        }
        let mut frames = Vec::new();
        for (span_start, span_length) in spans {
            frames.extend(self.bulk_read(span_start, span_length)?);
        }
        Ok(frames)
    }

    /// Write frames for the declared runs in `start..start + length` whose
    /// policy allows writing on edit. One frame per run, gaps are never sent.
    pub fn request_write(&self, start: u32, length: u32) -> Result<Vec<Vec<u8>>> {
        let Some(instance) = self.bound_instance() else {
            return Ok(Vec::new());
        };
        let mut runs: Vec<(u32, Vec<u8>)> = Vec::new();
        let mut skipped = 0;
        for run in instance.policy_runs(start, length, self.profile.sync_policy()) {
            if !run.policy.allows_write() {
                skipped += run.bytes.len();
                continue;
            }
            match runs.last_mut() {
                Some((at, bytes)) if u64::from(*at) + bytes.len() as u64 == u64::from(run.start) => {
                    bytes.extend(run.bytes)
                }
                _ => runs.push((run.start, run.bytes)),
            }
        }
        if skipped > 0 {
            debug!("{}Skipping {skipped} bulk-only bytes in write of {start:08x}", self.prefix);
        }
        let frames = self.encode_writes(runs)?;
        if !frames.is_empty() {
            debug!("{}<-- auto send parameters", self.prefix);
        }
        Ok(frames)
    }

    /// Read requests regardless of policy, for explicit user transfers.
    pub fn bulk_read(&self, start: u32, length: u32) -> Result<Vec<Vec<u8>>> {
        if !self.is_bound() || length == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .profile
            .protocol()
            .read_requests(self.channel, start, length)?)
    }

    /// Write frames regardless of policy, for explicit user transfers.
    pub fn bulk_write(&self, start: u32, length: u32) -> Result<Vec<Vec<u8>>> {
        let Some(instance) = self.bound_instance() else {
            return Ok(Vec::new());
        };
        self.encode_writes(instance.snapshot_runs(start, length))
    }

    fn bound_instance(&self) -> Option<&ParameterInstance> {
        self.instance.as_ref().filter(|_| self.is_bound())
    }

    fn encode_writes(&self, runs: Vec<(u32, Vec<u8>)>) -> Result<Vec<Vec<u8>>> {
        let mut frames = Vec::new();
        for (run_start, data) in runs {
            frames.extend(
                self.profile
                    .protocol()
                    .write_requests(self.channel, run_start, &data)?,
            );
        }
        Ok(frames)
    }

    /// Parts of the window that may be read on demand. Readable runs merge
    /// across gaps but never across a region that forbids reading. A window
    /// with no declared bytes follows the policy at its start.
    fn readable_spans(&self, start: u32, length: u32) -> Vec<(u32, u32)> {
        let runs = match self.instance.as_ref() {
            Some(instance) => instance.policy_runs(start, length, self.profile.sync_policy()),
            None => Vec::new(),
        };
        if runs.is_empty() {
            return if self.policy_at(start).allows_read() {
                vec![(start, length)]
            } else {
                Vec::new()
            };
        }

        let mut spans: Vec<(u32, u64)> = Vec::new();
        let mut open = false;
        for run in runs {
            if !run.policy.allows_read() {
                open = false;
                continue;
            }
            match spans.last_mut() {
                Some((_, end)) if open => *end = run.end(),
                _ => spans.push((run.start, run.end())),
            }
            open = true;
        }
        spans
            .into_iter()
            .map(|(span_start, end)| (span_start, (end - u64::from(span_start)) as u32))
            .collect()
    }

    // ==================== Inbound ====================

    pub fn on_sysex(&mut self, bytes: &[u8]) -> SysexOutcome {
        if self.state == SessionState::Closed {
            return SysexOutcome::NotClaimed;
        }

        if let Some(response) = IdentityResponse::parse(bytes) {
            if response.channel == self.channel && self.profile.compare_identity(&response).is_match() {
                info!("{}--> Duplicate identity response", self.prefix);
                return SysexOutcome::DuplicateIdentity;
            }
            return SysexOutcome::NotClaimed;
        }

        let protocol = self.profile.protocol();
        if !protocol.claims(self.channel, bytes) {
            return SysexOutcome::NotClaimed;
        }

        let (address, payload) = match protocol.decode(bytes) {
            Decoded::NotThisFormat => return SysexOutcome::NotClaimed,
            Decoded::Discarded(e) => {
                warn!("{}--> Discarded message: {e}", self.prefix);
                return SysexOutcome::Discarded;
            }
            decoded => match decoded.into_data() {
                Some(data) => data,
                None => return SysexOutcome::NotClaimed,
            },
        };
        SysexOutcome::Applied(self.apply(address, &payload))
    }

    fn apply(&mut self, address: u32, payload: &[u8]) -> WriteReport {
        debug!(
            "{}--> Received ~{} bytes at {address:08x}",
            self.prefix,
            payload.len()
        );
        let report = match self.instance.as_mut() {
            Some(instance) => instance.write_bytes(address, payload),
            None => WriteReport {
                unmapped: (address..).take(payload.len()).collect(),
                ..WriteReport::default()
            },
        };
        if let Some(first) = report.unmapped.first() {
            error!(
                "{}{} received bytes at unmapped addresses, first at {first:08x} (message at {address:08x})",
                self.prefix,
                report.unmapped.len()
            );
        }
        report
    }

    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            info!("{}Closed", self.prefix);
            self.state = SessionState::Closed;
        }
    }
}

impl fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSession")
            .field("id", &self.id)
            .field("profile", &self.profile.name())
            .field("endpoint", &self.endpoint)
            .field("channel", &self.channel)
            .field("state", &self.state)
            .finish()
    }
}
