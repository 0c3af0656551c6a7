use clap::{Args, Parser, Subcommand};

use crate::constants::app_elf;

#[derive(Parser)]
#[command(author, version, about = "Build and flash helper for aq-app")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that builds the firmware.
#[derive(Args)]
pub struct FirmwareArgs {
    /// Cargo features for aq-app, e.g. `defmt`
    #[arg(long)]
    pub features: Option<String>,

    #[arg(long)]
    pub release: bool,
}

impl FirmwareArgs {
    pub fn elf(&self) -> String {
        app_elf(self.release)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the firmware
    Build(FirmwareArgs),
    /// Build and flash the firmware
    Flash {
        #[command(flatten)]
        firmware: FirmwareArgs,

        /// Erase the whole chip first
        #[arg(long)]
        force: bool,
    },
    /// Build, flash, then stream RTT logs
    Run(FirmwareArgs),
    /// Stream RTT logs from an already flashed target
    Attach {
        #[arg(long)]
        release: bool,
    },
    /// Run the host-side test suites
    Test,
}
