//! Static description of one supported device model.

use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, OnceLock};
use synthlink_core::{Category, IdentityResponse, ParameterSchema, SyncPolicy, SysexProtocol};

/// Builds a model's parameter schema. Called at most once per profile.
pub type SchemaFactory = fn() -> synthlink_core::Result<ParameterSchema>;

/// Priority given to profiles that do not set one. Lower numbers win focus.
pub const DEFAULT_PRIORITY: u8 = 2;

/// Identity-response fields a model answers with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    pub manufacturer: SmallVec<[u8; 3]>,
    pub family: [u8; 2],
    pub model: [u8; 2],
    /// Firmware version the profile was written against.
    pub version: [u8; 4],
}

/// How an identity response compares to a [`DeviceIdentity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMatch {
    Mismatch,
    Exact,
    /// Same model, different firmware version. Still accepted.
    UntestedVersion,
}

impl IdentityMatch {
    #[inline]
    pub fn is_match(self) -> bool {
        !matches!(self, IdentityMatch::Mismatch)
    }
}

impl DeviceIdentity {
    pub fn new(manufacturer: &[u8], family: [u8; 2], model: [u8; 2], version: [u8; 4]) -> Self {
        Self {
            manufacturer: SmallVec::from_slice(manufacturer),
            family,
            model,
            version,
        }
    }

    /// Byte-exact on manufacturer, family and model; lenient on version.
    pub fn compare(&self, response: &IdentityResponse) -> IdentityMatch {
        if response.manufacturer != self.manufacturer
            || response.family != self.family
            || response.model != self.model
        {
            IdentityMatch::Mismatch
        } else if response.version != self.version {
            IdentityMatch::UntestedVersion
        } else {
            IdentityMatch::Exact
        }
    }
}

pub struct DeviceProfile {
    name: String,
    identity: Option<DeviceIdentity>,
    protocol: SysexProtocol,
    sync: SyncPolicy,
    priority: u8,
    icon: Option<Category>,
    schema_factory: Option<SchemaFactory>,
    schema: OnceLock<Option<Arc<ParameterSchema>>>,
}

impl DeviceProfile {
    pub fn builder(name: impl Into<String>) -> DeviceProfileBuilder {
        DeviceProfileBuilder::new(name)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    #[inline]
    pub fn protocol(&self) -> &SysexProtocol {
        &self.protocol
    }

    #[inline]
    pub fn sync_policy(&self) -> SyncPolicy {
        self.sync
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    #[inline]
    pub fn icon(&self) -> Option<Category> {
        self.icon
    }

    /// The model's schema, built on first use. `None` for identity-only models.
    ///
    /// # Panics
    ///
    /// Panics if the schema factory fails. Catalog schemas are static data, so
    /// a failure is a programming error in the catalog.
    pub fn schema(&self) -> Option<&Arc<ParameterSchema>> {
        self.schema
            .get_or_init(|| {
                let factory = self.schema_factory?;
                match factory() {
                    Ok(schema) => {
                        tracing::debug!(
                            "{}: built schema with {} parameters",
                            self.name,
                            schema.parameter_count()
                        );
                        Some(Arc::new(schema))
                    }
                    Err(e) => panic!("schema of profile '{}' is invalid: {e}", self.name),
                }
            })
            .as_ref()
    }

    pub fn has_schema(&self) -> bool {
        self.schema_factory.is_some()
    }

    /// Compare an identity response against this model without logging.
    pub fn compare_identity(&self, response: &IdentityResponse) -> IdentityMatch {
        self.identity
            .as_ref()
            .map_or(IdentityMatch::Mismatch, |identity| identity.compare(response))
    }

    /// Channel of non-identity traffic this model announces itself with.
    pub fn match_channel(&self, bytes: &[u8]) -> Option<u8> {
        self.protocol.match_channel(bytes)
    }

    /// `"<name>(<channel>) "`, the prefix of every session-scoped log line.
    pub fn log_prefix(&self, channel: u8) -> String {
        format!("{}({:02x}) ", self.name, channel)
    }
}

impl fmt::Debug for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceProfile")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("protocol", &self.protocol)
            .field("sync", &self.sync)
            .field("priority", &self.priority)
            .field("schema_built", &self.schema.get().is_some())
            .finish()
    }
}

pub struct DeviceProfileBuilder {
    name: String,
    identity: Option<DeviceIdentity>,
    protocol: SysexProtocol,
    sync: SyncPolicy,
    priority: u8,
    icon: Option<Category>,
    schema_factory: Option<SchemaFactory>,
}

impl DeviceProfileBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: None,
            protocol: SysexProtocol::IdentityOnly,
            sync: SyncPolicy::default(),
            priority: DEFAULT_PRIORITY,
            icon: None,
            schema_factory: None,
        }
    }

    pub fn identity(mut self, identity: DeviceIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn protocol(mut self, protocol: SysexProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn sync(mut self, policy: SyncPolicy) -> Self {
        self.sync = policy;
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn icon(mut self, icon: Category) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn schema(mut self, factory: SchemaFactory) -> Self {
        self.schema_factory = Some(factory);
        self
    }

    pub fn build(self) -> DeviceProfile {
        DeviceProfile {
            name: self.name,
            identity: self.identity,
            protocol: self.protocol,
            sync: self.sync,
            priority: self.priority,
            icon: self.icon,
            schema_factory: self.schema_factory,
            schema: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthlink_core::AddressedCodec;

    fn tiny_schema() -> synthlink_core::Result<ParameterSchema> {
        ParameterSchema::build(|root| {
            root.param("Level", 0..=127)?;
            Ok(())
        })
    }

    fn broken_schema() -> synthlink_core::Result<ParameterSchema> {
        ParameterSchema::build(|root| {
            root.param("A", 0..=127)?;
            root.group(0, "Clash", |g| {
                g.param("B", 0..=127)?;
                Ok(())
            })
        })
    }

    fn response(version: [u8; 4]) -> IdentityResponse {
        IdentityResponse {
            channel: 0x10,
            manufacturer: SmallVec::from_slice(&[0x41]),
            family: [0x0b, 0x01],
            model: [0x03, 0x00],
            version,
        }
    }

    fn profile() -> DeviceProfile {
        DeviceProfile::builder("Test")
            .identity(DeviceIdentity::new(&[0x41], [0x0b, 0x01], [0x03, 0x00], [0, 3, 0, 0]))
            .protocol(SysexProtocol::Addressed(AddressedCodec::new(0x41, 0x0b)))
            .schema(tiny_schema)
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let profile = DeviceProfile::builder("Bare").build();
        assert_eq!(profile.priority(), DEFAULT_PRIORITY);
        assert_eq!(profile.sync_policy(), SyncPolicy::RandomAccess);
        assert_eq!(profile.protocol(), &SysexProtocol::IdentityOnly);
        assert!(profile.schema().is_none());
        assert!(!profile.has_schema());
    }

    #[test]
    fn test_identity_version_is_lenient() {
        let profile = profile();
        assert_eq!(profile.compare_identity(&response([0, 3, 0, 0])), IdentityMatch::Exact);
        assert_eq!(
            profile.compare_identity(&response([0, 4, 0, 0])),
            IdentityMatch::UntestedVersion
        );

        let mut other = response([0, 3, 0, 0]);
        other.model = [0x04, 0x00];
        assert_eq!(profile.compare_identity(&other), IdentityMatch::Mismatch);
    }

    #[test]
    fn test_schema_is_built_once() {
        let profile = profile();
        let first = Arc::clone(profile.schema().unwrap());
        let second = profile.schema().unwrap();
        assert!(Arc::ptr_eq(&first, second));
        assert_eq!(first.parameter_count(), 1);
    }

    #[test]
    #[should_panic(expected = "schema of profile 'Broken' is invalid")]
    fn test_broken_schema_panics_on_first_use() {
        let profile = DeviceProfile::builder("Broken").schema(broken_schema).build();
        profile.schema();
    }

    #[test]
    fn test_log_prefix() {
        assert_eq!(profile().log_prefix(0x10), "Test(10) ");
    }
}
