//! Build script for healthwatch
//!
//! Exposes build metadata to `healthwatch::build_info()`.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let build_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    // docs.rs builds without a checkout or a rustc on PATH
    let docs_rs = std::env::var("DOCS_RS").is_ok();

    let git_hash = if docs_rs {
        Some("docs-rs-build".to_string())
    } else {
        command_output("git", &["rev-parse", "--short", "HEAD"])
    };
    println!(
        "cargo:rustc-env=GIT_HASH={}",
        git_hash.as_deref().unwrap_or("unknown")
    );

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rust_version = if docs_rs {
        Some("stable".to_string())
    } else {
        command_output(&rustc, &["--version"])
    };
    println!(
        "cargo:rustc-env=RUST_VERSION={}",
        rust_version.as_deref().unwrap_or("unknown")
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=DOCS_RS");
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    Some(stdout.trim().to_string())
}
