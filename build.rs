// SPDX-FileCopyrightText: 2025 Maciej Borzecki <maciek.borzecki@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::io;
use std::process::Command;

fn run_git(args: &[&str]) -> Result<String, io::Error> {
    let output = Command::new("git").args(args).output()?;

    if !output.status.success() {
        return Err(io::Error::other(format!("git {:?} failed", args)));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn build_git_version() -> Result<String, io::Error> {
    run_git(&["describe", "--abbrev=8", "--always", "--dirty"])
}

fn main() {
    if let Ok(vers) = build_git_version() {
        println!("cargo:rustc-env=BUILD_GIT_VERSION={}", vers);
    }

    // HEAD moves on checkout, the branch ref on commit
    for name in ["HEAD", "packed-refs"] {
        if let Ok(p) = run_git(&["rev-parse", "--git-path", name]) {
            println!("cargo:rerun-if-changed={}", p);
        }
    }
    if let Ok(head_ref) = run_git(&["symbolic-ref", "--quiet", "HEAD"]) {
        if let Ok(p) = run_git(&["rev-parse", "--git-path", &head_ref]) {
            println!("cargo:rerun-if-changed={}", p);
        }
    }
}
