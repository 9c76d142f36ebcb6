//! Build script for verso-persona
//!
//! Embeds the build stamp printed by `verso-persona version`: git commit
//! hash and dirty state, build timestamp and target triple.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_hash = command_stdout("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_dirty = git_dirty_state();

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let target = env_or_unknown("TARGET");

    let vars = [
        ("VERSO_GIT_HASH", git_hash.as_str()),
        ("VERSO_GIT_DIRTY", git_dirty),
        ("VERSO_BUILD_TIMESTAMP", build_timestamp.as_str()),
        ("VERSO_TARGET", target.as_str()),
    ];
    for (key, value) in vars {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

fn env_or_unknown(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| "unknown".to_string())
}

/// Run a command and return its trimmed stdout, or "unknown" on any failure
fn command_stdout(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// "true" when `git status --porcelain` reports changes
fn git_dirty_state() -> &'static str {
    match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(output) if output.status.success() && !output.stdout.is_empty() => "true",
        Ok(output) if output.status.success() => "false",
        _ => "unknown",
    }
}
