//! `xconv setup`: writes a commented config file to start from.

use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::info;

const CONFIG_TEMPLATE: &str = include_str!("../../docs/example_config.yaml");

pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Writes the template to `path`. An existing file is never replaced.
pub fn setup_at_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("{} already exists; edit it or remove it first", path.display())
        }
        Err(e) => return Err(e).with_context(|| format!("Cannot create {}", path.display())),
    };
    file.write_all(CONFIG_TEMPLATE.as_bytes())
        .with_context(|| format!("Cannot write {}", path.display()))?;

    info!(path = %path.display(), "Config template written");
    Ok(())
}
