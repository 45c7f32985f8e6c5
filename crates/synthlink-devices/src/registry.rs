//! Insertion-ordered set of known device profiles.
//!
//! The registry is filled at startup and read afterwards. Identity matching
//! walks profiles in registration order and the first match wins; priority
//! plays no part in it.

use crate::error::{Error, Result};
use crate::profile::{DeviceProfile, IdentityMatch};
use parking_lot::RwLock;
use std::sync::Arc;
use synthlink_core::sysex::hexdump;
use synthlink_core::IdentityResponse;

/// A profile claimed some session-less SysEx.
#[derive(Debug, Clone)]
pub struct ProfileMatch {
    pub profile: Arc<DeviceProfile>,
    pub channel: u8,
    /// True when matched through an identity response.
    pub by_identity: bool,
}

#[derive(Default)]
pub struct ProfileRegistry {
    profiles: RwLock<Vec<Arc<DeviceProfile>>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog.
    pub fn builtin() -> Self {
        let registry = Self::new();
        for profile in crate::catalog::builtin_profiles() {
            let registered = registry.register(profile);
            if let Err(e) = &registered {
                tracing::error!("Built-in catalog: {e}");
            }
            debug_assert!(registered.is_ok(), "duplicate name in the built-in catalog");
        }
        registry
    }

    pub fn register(&self, profile: DeviceProfile) -> Result<Arc<DeviceProfile>> {
        let mut profiles = self.profiles.write();
        if profiles.iter().any(|p| p.name() == profile.name()) {
            return Err(Error::DuplicateProfile(profile.name().to_string()));
        }
        let profile = Arc::new(profile);
        tracing::debug!("Registered device profile '{}'", profile.name());
        profiles.push(Arc::clone(&profile));
        Ok(profile)
    }

    pub fn get(&self, name: &str) -> Option<Arc<DeviceProfile>> {
        self.profiles.read().iter().find(|p| p.name() == name).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Arc<DeviceProfile>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))
    }

    /// All profiles in registration order.
    pub fn profiles(&self) -> Vec<Arc<DeviceProfile>> {
        self.profiles.read().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }

    /// First profile whose identity matches `response`.
    ///
    /// Logs the match at info, and a warning when the firmware version differs
    /// from the one the profile was written for.
    pub fn match_identity(&self, response: &IdentityResponse) -> Option<Arc<DeviceProfile>> {
        let profiles = self.profiles.read();
        let (profile, how) = profiles.iter().find_map(|p| {
            let how = p.compare_identity(response);
            how.is_match().then_some((p, how))
        })?;

        let prefix = profile.log_prefix(response.channel);
        tracing::info!("{prefix}--> Identity response");
        if how == IdentityMatch::UntestedVersion {
            tracing::warn!(
                "{prefix}The device reports version {}, which is untested.",
                hexdump(&response.version)
            );
        }
        Some(Arc::clone(profile))
    }

    /// Profile and channel for SysEx that no session claimed.
    ///
    /// Identity responses are matched by identity; anything else only by
    /// profiles whose protocol identifies the sender from the message shape.
    pub fn match_sysex(&self, bytes: &[u8]) -> Option<ProfileMatch> {
        if let Some(response) = IdentityResponse::parse(bytes) {
            return self.match_identity(&response).map(|profile| ProfileMatch {
                profile,
                channel: response.channel,
                by_identity: true,
            });
        }
        self.profiles.read().iter().find_map(|profile| {
            profile.match_channel(bytes).map(|channel| {
                tracing::info!("{}--> Recognised from traffic", profile.log_prefix(channel));
                ProfileMatch {
                    profile: Arc::clone(profile),
                    channel,
                    by_identity: false,
                }
            })
        })
    }
}

impl std::fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("profiles", &self.names())
            .finish()
    }
}
