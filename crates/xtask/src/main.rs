mod build;
mod cli;
mod constants;
mod probe;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, FirmwareArgs};
use constants::app_elf;

fn flash(firmware: &FirmwareArgs, force: bool) -> Result<()> {
    build::build_app(firmware.features.as_deref(), firmware.release)?;
    if force {
        probe::erase_chip()?;
    }
    probe::download(&firmware.elf())
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Build(firmware) => {
            build::build_app(firmware.features.as_deref(), firmware.release)?;
            println!("Build complete!");
        }
        Commands::Flash { firmware, force } => flash(&firmware, force)?,
        Commands::Run(firmware) => {
            flash(&firmware, false)?;
            probe::attach(&firmware.elf())?;
        }
        Commands::Attach { release } => probe::attach(&app_elf(release))?,
        Commands::Test => build::test_host()?,
    }

    Ok(())
}
