use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub fn get_clip_feedback_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".clip-feedback"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let dir = get_clip_feedback_dir()?;
    Ok(dir.join("config.toml"))
}
