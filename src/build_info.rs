//! Build information
//!
//! Compile-time metadata stamped in by `build.rs`.

use serde::Serialize;

/// Build number, as stamped by the build script
pub const BUILD_NUMBER: u64 = match option_env!("RXHUB_BUILD_NUMBER") {
    Some(s) => digits_to_u64(s),
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("RXHUB_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Parse a decimal string at compile time; anything non-numeric yields 0
const fn digits_to_u64(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut acc: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return 0;
        }
        acc = acc * 10 + (b - b'0') as u64;
        i += 1;
    }
    acc
}

/// Build metadata reported by the status tool
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    /// One-line banner, e.g. `rxhub 1.0.0 (build 12, 2026-10-16T09:00:00Z)`
    pub fn banner(&self) -> String {
        format!(
            "{} {} (build {}, {})",
            self.name, self.version, self.build_number, self.build_timestamp
        )
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  RxHub - Patient Hub Tools");
    eprintln!("  {}", info.banner());
    eprintln!("===============================================");
}
