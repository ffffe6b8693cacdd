// fleetcheck-core/src/infrastructure/fs.rs

use crate::error::FleetError;
use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses a filesystem: readers see either the old file or the new one.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Report file inside `output_dir`. Instance names come from the inventory,
/// so anything that could escape the directory is refused.
pub fn report_path(output_dir: &Path, file_name: &str) -> Result<PathBuf, FleetError> {
    let candidate = Path::new(file_name);
    let single_component = candidate.components().count() == 1
        && matches!(candidate.components().next(), Some(Component::Normal(_)));
    if !single_component {
        return Err(FleetError::UnsafePath(file_name.to_string()));
    }
    Ok(output_dir.join(candidate))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("report.json");

        atomic_write(&file_path, "{}")?;
        atomic_write(&file_path, "{\"ok\": true}")?;

        assert_eq!(fs::read_to_string(file_path)?, "{\"ok\": true}");
        Ok(())
    }

    #[test]
    fn test_report_path_refuses_traversal() {
        let out = Path::new("/tmp/reports");
        assert!(report_path(out, "PROD-20250101.html").is_ok());
        assert!(matches!(report_path(out, "../etc/passwd"), Err(FleetError::UnsafePath(_))));
        assert!(report_path(out, "/abs.html").is_err());
    }
}
