//! SessionManager builder.

use std::sync::Arc;

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::transport::SysexTransport;
use synthlink_devices::ProfileRegistry;

use super::SessionManager;

#[derive(Default)]
pub struct SessionManagerBuilder {
    pub(super) config: EditorConfig,
    pub(super) registry: Option<Arc<ProfileRegistry>>,
    pub(super) transport: Option<Box<dyn SysexTransport>>,
}

impl SessionManagerBuilder {
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Profiles to match against. Defaults to the built-in catalog.
    pub fn registry(mut self, registry: Arc<ProfileRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn transport<T: SysexTransport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Validate the config and, when `identify_on_start` is set, broadcast an
    /// identity request on every endpoint.
    pub fn build(self) -> Result<SessionManager> {
        self.config.validate()?;
        let transport = self
            .transport
            .ok_or_else(|| Error::InvalidConfig("a transport is required".into()))?;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(ProfileRegistry::builtin()));

        let mut manager = SessionManager {
            config: self.config,
            registry,
            transport,
            sessions: Vec::new(),
            next_session: 0,
            on_new_session: Vec::new(),
        };
        if manager.config.identify_on_start {
            manager.send_identity_request()?;
        }
        Ok(manager)
    }
}
