use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::AppError;
use crate::model::BindingList;

/// Encodes the list as indented JSON.
pub fn to_json(list: &BindingList) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(list)?)
}

/// Writes the list to `path` through a temporary file in the same directory,
/// so readers never observe a partially written list.
pub fn write_binding_list(path: &Path, list: &BindingList) -> Result<usize, AppError> {
    let data = to_json(list)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(&data)?;
    file.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file().set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    file.persist(path)?;
    Ok(data.len())
}
