/// Milliseconds since the UNIX epoch, used for informational element timestamps
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Milliseconds since the UNIX epoch, used for informational element timestamps
#[cfg(target_arch = "wasm32")]
pub fn timestamp_millis() -> u64 {
    // No wall clock without the host; insertion order is authoritative anyway
    0
}
