use anyhow::{Context, Result};
use std::path::Path;

/// Ensure directory exists
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))?;
    }
    Ok(())
}

/// Format duration as human-readable string
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

/// Validation utilities
pub mod validation {
    use anyhow::{bail, Result};

    /// Validate that value is positive
    pub fn positive<T: PartialOrd + Default + std::fmt::Display>(
        value: T,
        name: &str,
    ) -> Result<()> {
        if value <= T::default() {
            bail!("{} must be positive, got {}", name, value);
        }
        Ok(())
    }
}
