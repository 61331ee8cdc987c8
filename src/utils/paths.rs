use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let folio_dir = data_dir.join("folio");
    create_secure_directory(&folio_dir).context("Failed to create folio data directory")?;

    Ok(folio_dir)
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let folio_dir = config_dir.join("folio");
    create_secure_directory(&folio_dir).context("Failed to create folio config directory")?;

    Ok(folio_dir)
}

pub fn get_backup_dir() -> Result<PathBuf> {
    let backup_dir = get_data_dir()?.join("backups");
    create_secure_directory(&backup_dir).context("Failed to create backup directory")?;
    Ok(backup_dir)
}

/// Create a directory readable only by its owner.
pub fn create_secure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        validate_directory_permissions(path)?;
        return Ok(());
    }

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o700);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn validate_directory_permissions(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for: {}", path.display()))?;

    if !metadata.is_dir() {
        return Err(anyhow::anyhow!("Path is not a directory: {}", path.display()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = metadata.permissions().mode();
        // Client and payment records must not be world-writable
        if mode & 0o002 != 0 {
            return Err(anyhow::anyhow!(
                "Directory is world-writable (insecure): {}",
                path.display()
            ));
        }
    }

    Ok(())
}
