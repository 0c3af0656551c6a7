pub const TARGET: &str = "thumbv7em-none-eabihf";
pub const CHIP: &str = "nRF52840_xxAA";
pub const APP_MANIFEST: &str = "crates/aq-app/Cargo.toml";
pub const APP_NAME: &str = "aq-app";

/// Crates whose tests run on the host.
pub const HOST_CRATES: &[&str] = &["ccs811", "aq-icd", "aq-monitor"];

pub fn app_elf(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{TARGET}/{profile}/{APP_NAME}")
}
