//! Process-scoped editor context and its poll loop.
//!
//! ## Quick Start
//!
//! ```ignore
//! use synthlink_midi_io::{MidirTransport, EditorConfig, SessionManager};
//!
//! let config = EditorConfig::default();
//! let mut transport = MidirTransport::new(&config)?;
//! transport.connect_by_name("D2")?;
//!
//! let mut editor = SessionManager::builder()
//!     .config(config)
//!     .transport(transport)
//!     .build()?;
//!
//! loop {
//!     editor.poll();
//!     if let Some(session) = editor.focused_session() {
//!         // navigate session.instance(), register observers ...
//!     }
//! }
//! ```

mod builder;

pub use builder::SessionManagerBuilder;

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::session::{DeviceSession, SessionId, SessionState};
use crate::transport::{EndpointId, EndpointInfo, SysexTransport};
use std::sync::Arc;
use synthlink_core::sysex::{hexdump, is_sysex, Decoded};
use synthlink_core::{IdentityResponse, IDENTITY_REQUEST};
use synthlink_devices::{DeviceProfile, ProfileRegistry};
use tracing::{debug, info, warn};

/// Called once for every session the manager creates.
pub type SessionCallback = Box<dyn FnMut(&DeviceSession)>;

/// Owns the transport, the profile registry and every live session.
///
/// All work happens inside [`poll`](Self::poll) and the request methods, on
/// the caller's thread.
pub struct SessionManager {
    config: EditorConfig,
    registry: Arc<ProfileRegistry>,
    transport: Box<dyn SysexTransport>,
    sessions: Vec<DeviceSession>,
    next_session: u64,
    on_new_session: Vec<SessionCallback>,
}

impl SessionManager {
    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::default()
    }

    #[inline]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ProfileRegistry> {
        &self.registry
    }

    pub fn endpoints(&self) -> Vec<EndpointInfo> {
        self.transport.endpoints()
    }

    // ==================== Poll loop ====================

    /// Drain the transport and dispatch everything received. Returns the
    /// number of buffers handled.
    pub fn poll(&mut self) -> usize {
        let inbound = self.transport.poll();
        let count = inbound.len();
        for message in inbound {
            self.dispatch(message.endpoint, &message.bytes);
        }
        count
    }

    /// Offer one buffer to the sessions on `endpoint`, then to the registry.
    pub fn dispatch(&mut self, endpoint: EndpointId, bytes: &[u8]) {
        if bytes.len() > self.config.max_inbound_len {
            warn!(
                "--> Dropping {} byte message from {endpoint}, limit is {}",
                bytes.len(),
                self.config.max_inbound_len
            );
            return;
        }
        if !is_sysex(bytes) {
            debug!("--> Ignoring non-SysEx data from {endpoint}");
            return;
        }
        debug!("--> {}", hexdump(bytes));

        let claimed = self
            .sessions
            .iter_mut()
            .filter(|s| s.endpoint() == endpoint)
            .any(|s| s.on_sysex(bytes).is_claimed());
        if claimed {
            return;
        }

        if let Some(found) = self.registry.match_sysex(bytes) {
            if !found.by_identity {
                let decoded = found.profile.protocol().decode(bytes);
                if !matches!(decoded, Decoded::Data { .. } | Decoded::Shaped(_)) {
                    warn!(
                        "{}--> Unusable traffic from {endpoint}, no session opened: {decoded:?}",
                        found.profile.log_prefix(found.channel)
                    );
                    return;
                }
            }
            let index = self.open_session(endpoint, found.profile, found.channel);
            if !found.by_identity {
                self.sessions[index].on_sysex(bytes);
            }
            return;
        }

        match IdentityResponse::parse(bytes) {
            Some(response) => info!(
                "--> Identity response from unknown device: manufacturer {}, family {}, model {}",
                hexdump(&response.manufacturer),
                hexdump(&response.family),
                hexdump(&response.model)
            ),
            None => warn!("--> Unrecognized sysex ({} bytes) from {endpoint}", bytes.len()),
        }
        if self.config.hexdump_unrecognized {
            debug!("{}", hexdump(bytes));
        }
    }

    fn open_session(&mut self, endpoint: EndpointId, profile: Arc<DeviceProfile>, channel: u8) -> usize {
        let id = SessionId(self.next_session);
        self.next_session += 1;

        let mut session = DeviceSession::new(id, profile, endpoint, channel);
        session.bind();
        info!("{}Opened {id} on {endpoint}", session.profile().log_prefix(channel));

        for callback in self.on_new_session.iter_mut() {
            callback(&session);
        }
        self.sessions.push(session);
        self.sessions.len() - 1
    }

    /// Register a callback run for every session created from now on.
    pub fn on_new_session<F>(&mut self, callback: F)
    where
        F: FnMut(&DeviceSession) + 'static,
    {
        self.on_new_session.push(Box::new(callback));
    }

    // ==================== Sessions ====================

    pub fn session(&self, id: SessionId) -> Option<&DeviceSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut DeviceSession> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    /// Every session in creation order, closed ones included.
    pub fn sessions(&self) -> &[DeviceSession] {
        &self.sessions
    }

    /// Session the UI should show first: lowest priority number among open
    /// sessions, earliest created on ties.
    pub fn focused_session(&self) -> Option<&DeviceSession> {
        self.sessions
            .iter()
            .filter(|s| s.is_bound())
            .min_by_key(|s| s.profile().priority())
    }

    /// Close every session on `endpoint`. Returns how many were open.
    pub fn close_endpoint(&mut self, endpoint: EndpointId) -> usize {
        let mut closed = 0;
        for session in self.sessions.iter_mut().filter(|s| s.endpoint() == endpoint) {
            if session.is_bound() {
                closed += 1;
            }
            session.close();
        }
        closed
    }

    /// Forget closed sessions.
    pub fn prune_closed(&mut self) {
        self.sessions.retain(|s| s.state() != SessionState::Closed);
    }

    // ==================== Requests ====================

    pub fn send_identity_request(&mut self) -> Result<()> {
        info!("<-- Identity request");
        debug!("<-- {}", hexdump(&IDENTITY_REQUEST));
        self.transport.broadcast(&IDENTITY_REQUEST)
    }

    /// Ask the device for the random-access parts of `start..start + length`.
    /// Returns whether a request was sent.
    pub fn request_read(&mut self, id: SessionId, start: u32, length: u32) -> Result<bool> {
        let session = self.session(id).ok_or(Error::UnknownSession(id))?;
        let frames = session.request_read(start, length)?;
        self.send_frames(id, &frames)?;
        Ok(!frames.is_empty())
    }

    /// Send the declared bytes of `start..start + length` if the region's
    /// policy writes on edit. Returns the number of frames sent.
    pub fn request_write(&mut self, id: SessionId, start: u32, length: u32) -> Result<usize> {
        let session = self.session(id).ok_or(Error::UnknownSession(id))?;
        let frames = session.request_write(start, length)?;
        self.send_frames(id, &frames)?;
        Ok(frames.len())
    }

    /// Read request for an explicit user transfer, whatever the policy.
    pub fn bulk_read(&mut self, id: SessionId, start: u32, length: u32) -> Result<bool> {
        let session = self.session(id).ok_or(Error::UnknownSession(id))?;
        let frames = session.bulk_read(start, length)?;
        self.send_frames(id, &frames)?;
        Ok(!frames.is_empty())
    }

    /// Write frames for an explicit user transfer, whatever the policy.
    pub fn bulk_write(&mut self, id: SessionId, start: u32, length: u32) -> Result<usize> {
        let session = self.session(id).ok_or(Error::UnknownSession(id))?;
        let frames = session.bulk_write(start, length)?;
        self.send_frames(id, &frames)?;
        Ok(frames.len())
    }

    /// Store an edited value and write it back per the region's policy.
    ///
    /// Out-of-range values are stored and sent like any other, as long as
    /// they fit a 7-bit data byte. Larger values stay local and the write
    /// fails with [`UnencodableData`](synthlink_core::Error::UnencodableData).
    pub fn set_parameter(&mut self, id: SessionId, address: u32, value: u8) -> Result<usize> {
        let session = self.session_mut(id).ok_or(Error::UnknownSession(id))?;
        let instance = session
            .instance_mut()
            .ok_or(synthlink_core::Error::UnmappedAddress(address))?;
        match instance.set(address, value) {
            Ok(false) => return Ok(0),
            Ok(true) | Err(synthlink_core::Error::ValueOutOfRange { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        self.request_write(id, address, 1)
    }

    fn send_frames(&mut self, id: SessionId, frames: &[Vec<u8>]) -> Result<()> {
        let session = self.session(id).ok_or(Error::UnknownSession(id))?;
        let endpoint = session.endpoint();
        let prefix = session.profile().log_prefix(session.channel());
        for frame in frames {
            debug!("{prefix}<-- {}", hexdump(frame));
            self.transport.send(endpoint, frame)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("sessions", &self.sessions)
            .finish()
    }
}
