//! `rebooter config` – show where configuration lives and what is in effect.

use anyhow::Result;
use rebooter_core::config::{self, RebooterConfig};
use std::path::Path;

pub fn run_config(explicit: Option<&Path>, cfg: &RebooterConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
