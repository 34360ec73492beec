//! Build script for RxHub
//!
//! Stamps each compilation with a build number and UTC timestamp.

use std::env;
use std::fs;
use std::path::PathBuf;

/// Read the last build number from the counter file, if any
fn previous_build(counter: &PathBuf) -> u64 {
    fs::read_to_string(counter)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=RXHUB_BUILD_NUMBER");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let counter = PathBuf::from(manifest_dir).join("build_number.txt");

    // CI pins the number explicitly; local builds keep counting
    let build = match env::var("RXHUB_BUILD_NUMBER").ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(pinned) => pinned,
        None => {
            let next = previous_build(&counter) + 1;
            if let Err(e) = fs::write(&counter, next.to_string()) {
                println!("cargo:warning=could not update {}: {}", counter.display(), e);
            }
            next
        }
    };

    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=RXHUB_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=RXHUB_BUILD_TIMESTAMP={}", stamp);
}
