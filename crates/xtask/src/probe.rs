//! `probe-rs` invocations for the nRF52840 target.

use anyhow::{Context, Result};
use std::process::Command;

use crate::constants::CHIP;

fn probe_rs(subcommand: &str, args: &[&str]) -> Result<()> {
    let status = Command::new("probe-rs")
        .arg(subcommand)
        .args(["--chip", CHIP])
        .args(args)
        .status()
        .with_context(|| format!("Failed to spawn probe-rs {subcommand}"))?;

    if !status.success() {
        anyhow::bail!("probe-rs {subcommand} {} failed", args.join(" "));
    }
    Ok(())
}

pub fn erase_chip() -> Result<()> {
    println!("Erasing chip...");
    probe_rs("erase", &["--allow-erase-all"])
}

/// Writes only the sectors that differ from what is already on the chip.
pub fn download(elf: &str) -> Result<()> {
    println!("Flashing {elf}...");
    probe_rs("download", &[elf, "--preverify", "--restore-unwritten"])
}

pub fn attach(elf: &str) -> Result<()> {
    println!("Attaching RTT...");
    probe_rs("attach", &[elf])
}
