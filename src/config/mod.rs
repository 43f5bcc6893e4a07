//! Configuration loading for Posture

mod schema;

pub use schema::{
    Config, ServerOverrides, ServerSettings, DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    DEFAULT_STATIC_DIR,
};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".posturerc.json";

/// Environment variable holding the listening port
pub const PORT_ENV: &str = "PORT";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    config.resolve_paths(config_dir);

    if let Some(extends) = config.extends.take() {
        let mut extends_path = config_dir.join(&extends);
        if extends_path.extension().is_none() {
            extends_path.set_extension("json");
        }
        if !extends_path.exists() {
            anyhow::bail!(
                "Extended config not found: {} (referenced from {})",
                extends_path.display(),
                config_path.display()
            );
        }
        let base_config = load_config_with_extends(&extends_path, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Search for .posturerc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Parse a `PORT` value. Unset or blank means "not given".
pub fn parse_port(value: Option<&str>) -> Result<Option<u16>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u16>()
            .map(Some)
            .with_context(|| format!("{} must be a port number, got '{}'", PORT_ENV, raw)),
    }
}

/// Read the port from the `PORT` environment variable
pub fn port_from_env() -> Result<Option<u16>> {
    parse_port(std::env::var(PORT_ENV).ok().as_deref())
}

/// Write a starter config into `dir`. Refuses to overwrite an existing file.
pub fn write_starter_config(dir: &Path, port: u16) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let json = serde_json::to_string_pretty(&Config::starter(port))?;
    fs::write(&path, format!("{}\n", json))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
