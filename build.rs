//! Build script for healthlog
//!
//! Increments build number on each recompilation and embeds build metadata.

use std::fs;
use std::path::Path;

fn main() {
    // Only rerun when src/ files change
    println!("cargo:rerun-if-changed=src");

    let build_number_path = Path::new("build_number.txt");

    let current_build: u64 = fs::read_to_string(build_number_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let new_build = current_build + 1;

    // A read-only checkout still builds; the number just doesn't advance
    if fs::write(build_number_path, new_build.to_string()).is_err() {
        println!("cargo:warning=could not persist build number");
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=HEALTHLOG_BUILD_NUMBER={}", new_build);
    println!("cargo:rustc-env=HEALTHLOG_BUILD_TIMESTAMP={}", timestamp);
}
