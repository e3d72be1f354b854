//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a UTF-8 file with standardized error handling.
///
/// The error context names the file, so a failing bundle is identifiable
/// from the message alone.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })
}

/// Replace an existing file's content atomically (write to .tmp, then rename).
///
/// The rename is atomic on POSIX filesystems, so readers always see either
/// the old content or the new content. Symlinks are resolved first so the
/// link target is rewritten, the target's permission bits are carried over,
/// and a read-only target is refused.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let operation = format!("write {}", path.display());

    let target = fs::canonicalize(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.clone())))?;

    let permissions = fs::metadata(&target)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.clone())))?
        .permissions();
    if permissions.readonly() {
        return Err(Error::internal_io(
            format!("File is read-only: {}", target.display()),
            Some(operation),
        ));
    }

    let parent = target.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", target.display()),
            Some(operation.clone()),
        )
    })?;

    let filename = target.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", target.display()),
            Some(operation.clone()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    fs::set_permissions(&tmp_path, permissions)
        .and_then(|_| fs::rename(&tmp_path, &target))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
        })?;

    Ok(())
}
