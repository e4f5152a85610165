use log::info;
use std::fs;
use std::path::Path;

pub mod security;
pub mod token;

/// Creates the parent directory of the SQLite file if it is missing.
pub fn ensure_data_dir(database_path: &str) -> std::io::Result<()> {
    if let Some(dir) = Path::new(database_path).parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            info!("Creating data directory {}...", dir.display());
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
