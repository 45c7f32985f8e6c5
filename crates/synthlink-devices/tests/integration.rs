//! Integration tests for synthlink-devices.
//!
//! These tests run the built-in catalog against synthetic device traffic.

use synthlink_core::{Category, IdentityResponse, SyncPolicy, SysexProtocol, IDENTITY_REQUEST};
use synthlink_devices::catalog::{alpha_juno, pcr_a30, roland_d2, yamaha_mu50};
use synthlink_devices::ProfileRegistry;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

const D2_REPLY: [u8; 15] = [
    0xf0, 0x7e, 0x00, 0x06, 0x02, 0x41, 0x0b, 0x01, 0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0xf7,
];

// ---------------------------------------------------------------------------
// 1. Built-in registry
// ---------------------------------------------------------------------------

#[test]
fn test_builtin_registration_order() {
    init_tracing();
    let registry = ProfileRegistry::builtin();
    assert_eq!(
        registry.names(),
        vec![pcr_a30::NAME, alpha_juno::NAME, roland_d2::NAME, yamaha_mu50::NAME]
    );
}

#[test]
fn test_builtin_profiles_are_tagged() {
    init_tracing();
    let registry = ProfileRegistry::builtin();

    let d2 = registry.require(roland_d2::NAME).unwrap();
    assert_eq!(d2.sync_policy(), SyncPolicy::RandomAccess);
    assert_eq!(d2.priority(), 1);
    assert_eq!(d2.icon(), Some(Category::Tone));
    assert!(matches!(d2.protocol(), SysexProtocol::Addressed(_)));

    let juno = registry.require(alpha_juno::NAME).unwrap();
    assert_eq!(juno.sync_policy(), SyncPolicy::PushOnly);
    assert!(juno.identity().is_none());

    let mu50 = registry.require(yamaha_mu50::NAME).unwrap();
    assert!(mu50.schema().is_none());
}

// ---------------------------------------------------------------------------
// 2. Identity handshake
// ---------------------------------------------------------------------------

#[test]
fn test_d2_identity_reply_selects_d2() {
    init_tracing();
    let registry = ProfileRegistry::builtin();
    let found = registry.match_sysex(&D2_REPLY).unwrap();
    assert_eq!(found.profile.name(), roland_d2::NAME);
    assert_eq!(found.channel, 0);
    assert!(found.by_identity);
}

#[test]
fn test_untested_version_still_matches() {
    init_tracing();
    let registry = ProfileRegistry::builtin();
    let mut reply = IdentityResponse::parse(&D2_REPLY).unwrap();
    reply.version = [0x00, 0x04, 0x00, 0x00];
    reply.channel = 0x10;
    let found = registry.match_sysex(&reply.to_bytes()).unwrap();
    assert_eq!(found.profile.name(), roland_d2::NAME);
    assert_eq!(found.channel, 0x10);
}

#[test]
fn test_mu50_identity_reply() {
    init_tracing();
    let reply = [
        0xf0, 0x7e, 0x00, 0x06, 0x02, 0x43, 0x00, 0x41, 0x46, 0x01, 0x00, 0x00, 0x00, 0x01, 0xf7,
    ];
    let registry = ProfileRegistry::builtin();
    assert_eq!(registry.match_sysex(&reply).unwrap().profile.name(), yamaha_mu50::NAME);
}

#[test]
fn test_requests_and_foreign_traffic_match_nothing() {
    init_tracing();
    let registry = ProfileRegistry::builtin();
    assert!(registry.match_sysex(&IDENTITY_REQUEST).is_none());

    // D2 data traffic needs a session; the registry only knows identities.
    let d2 = registry.require(roland_d2::NAME).unwrap();
    let frame = d2.protocol().write_requests(0, roland_d2::PATCHES, &[0x41]).unwrap();
    assert!(registry.match_sysex(&frame[0]).is_none());
}

// ---------------------------------------------------------------------------
// 3. Alpha Juno is recognised from its tone dumps
// ---------------------------------------------------------------------------

#[test]
fn test_alpha_juno_full_patch_creates_match() {
    init_tracing();
    let registry = ProfileRegistry::builtin();
    let juno = registry.require(alpha_juno::NAME).unwrap();
    let tone = vec![0x10; 46];
    let frames = juno.protocol().write_requests(4, 0, &tone).unwrap();

    let found = registry.match_sysex(&frames[0]).unwrap();
    assert_eq!(found.profile.name(), alpha_juno::NAME);
    assert_eq!(found.channel, 4);
    assert!(!found.by_identity);

    let (address, payload) = juno.protocol().decode(&frames[0]).into_data().unwrap();
    let mut instance = juno.schema().unwrap().instantiate();
    let report = instance.write_bytes(address, &payload);
    assert_eq!(report.changed, 46);
    // 0x10 exceeds the 0..=3 switches but is stored anyway.
    assert!(report.out_of_range > 0);
    assert!(report.unmapped.is_empty());
    assert_eq!(instance.value(alpha_juno::TONE_NAME).unwrap(), 0x10);
}
