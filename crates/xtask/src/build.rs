use crate::constants::{APP_MANIFEST, HOST_CRATES, TARGET};
use anyhow::{Context, Result};
use std::process::Command;

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to spawn cargo {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}

pub fn build_app(features: Option<&str>, release: bool) -> Result<()> {
    println!("Building {APP_MANIFEST}...");
    let mut args = vec![
        "build",
        "--no-default-features",
        "--manifest-path",
        APP_MANIFEST,
        "--target",
        TARGET,
    ];
    if release {
        args.push("--release");
    }
    if let Some(features) = features {
        args.extend(["--features", features]);
    }
    cargo(&args)
}

pub fn test_host() -> Result<()> {
    let mut args = vec!["test"];
    for krate in HOST_CRATES {
        args.extend(["--package", *krate]);
    }
    cargo(&args)
}
