// btbphylo-core/src/infrastructure/fs.rs

use serde::{Serialize, de::DeserializeOwned};
use std::io::Write;
use std::path::Path;

use crate::infrastructure::error::InfrastructureError;

/// Writes `content` to `path` through a temporary file in the same directory,
/// so readers never see a half-written table. Parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), InfrastructureError> {
    let content = serde_json::to_string_pretty(value)?;
    atomic_write(path, content)
}

/// Reads a JSON document, or the default value when the file does not exist.
pub fn read_json_or_default<T: DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, InfrastructureError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parent_dirs() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("results/missing/missing_wgs.csv");

        atomic_write(&file_path, "Submission\n")?;
        assert_eq!(fs::read_to_string(&file_path)?, "Submission\n");

        atomic_write(&file_path, "Submission\nAF-1\n")?;
        assert_eq!(fs::read_to_string(file_path)?, "Submission\nAF-1\n");
        Ok(())
    }

    #[test]
    fn test_json_round_trip_and_default() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metadata.json");

        let empty: BTreeMap<String, u32> = read_json_or_default(&path)?;
        assert!(empty.is_empty());

        write_json(&path, &BTreeMap::from([("passed".to_string(), 3u32)]))?;
        let back: BTreeMap<String, u32> = read_json_or_default(&path)?;
        assert_eq!(back.get("passed"), Some(&3));
        Ok(())
    }
}
