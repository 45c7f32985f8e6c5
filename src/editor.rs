//! Ready-made editor setups.

use crate::error::Result;
use synthlink_midi_io::{
    EditorConfig, EndpointId, MemoryHandle, MemoryTransport, SessionManager,
};

/// Editor over the in-memory transport, with one endpoint per name.
///
/// Used for offline tooling and tests: traffic is injected and inspected
/// through the returned handle.
pub fn offline_editor(
    config: EditorConfig,
    endpoints: &[&str],
) -> Result<(SessionManager, MemoryHandle, Vec<EndpointId>)> {
    let mut transport = MemoryTransport::new(config.inbox_capacity);
    let ids = endpoints
        .iter()
        .map(|name| transport.add_endpoint(*name))
        .collect();
    let handle = transport.handle();
    let manager = SessionManager::builder()
        .config(config)
        .transport(transport)
        .build()?;
    Ok((manager, handle, ids))
}

/// Editor over hardware MIDI ports.
///
/// Each entry of `port_names` is matched case-insensitively against both
/// input and output port names and becomes one endpoint. With
/// `identify_on_start` set, every connected device is asked for its identity.
#[cfg(feature = "midi-io")]
pub fn hardware_editor(config: EditorConfig, port_names: &[&str]) -> Result<SessionManager> {
    let mut transport = synthlink_midi_io::MidirTransport::new(&config)?;
    for name in port_names {
        let endpoint = transport.connect_by_name(name)?;
        tracing::info!("Using '{name}' as endpoint {endpoint}");
    }
    Ok(SessionManager::builder()
        .config(config)
        .transport(transport)
        .build()?)
}
