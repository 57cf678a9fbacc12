use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Initializes the hub by creating an `.aide` directory with an empty key
/// store.
pub fn initialize_project(base_path: &Path) -> std::io::Result<()> {
    let aide_dir = base_path.join(".aide");
    fs::create_dir_all(&aide_dir)?;

    let credentials_path = aide_dir.join("credentials.json");
    if !credentials_path.exists() {
        fs::write(credentials_path, "{}")?;
    }

    Ok(())
}

/// Verifies that an `.aide` directory exists in the given base path.
pub fn verify_project_initialized(base_path: &Path) -> std::io::Result<()> {
    let aide_dir = base_path.join(".aide");
    if !aide_dir.exists() || !aide_dir.is_dir() {
        return Err(Error::new(
            ErrorKind::NotFound,
            "Key store not initialized. Please run `aide init` first.",
        ));
    }
    Ok(())
}
