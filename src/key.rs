//! Key resolution
//!
//! Turns a caller-supplied key into a path beneath the store root.
//!
//! Keys use `/` as the only separator, so `"saves/slot1"` lives at
//! `{root}/saves/slot1`. Anything that could leave the root is rejected
//! with `InvalidKey` before the filesystem is touched:
//! - empty keys, or keys with no named segment (`"."`, `"//"`)
//! - absolute keys (`"/etc/passwd"`)
//! - `..` segments
//! - NUL bytes and backslashes
//! - segments the platform would parse as a prefix or root (`"C:"`)
//! - segments starting with the reserved temp-file prefix, which listings hide
//!
//! `.` segments and repeated separators are dropped.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, StorageError};
use crate::fs::TEMP_PREFIX;

/// Validate `key` and return its canonical `a/b/c` form
pub fn normalize(key: &str) -> Result<String> {
    Ok(segments(key, false)?.join("/"))
}

/// Path of the file backing `key`
pub(crate) fn resolve(root: &Path, key: &str) -> Result<PathBuf> {
    let normalized = normalize(key)?;
    Ok(root.join(normalized))
}

/// Path of a directory under the root; `""` is the root itself
pub(crate) fn resolve_dir(root: &Path, dir: &str) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in segments(dir, true)? {
        path.push(segment);
    }
    Ok(path)
}

/// Inverse of `resolve`: the key naming `path`, if it sits under `root`
///
/// `None` for names that are not UTF-8, since no key could resolve to them.
pub(crate) fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rest = path.strip_prefix(root).ok()?;
    let parts = rest
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn segments(key: &str, allow_empty: bool) -> Result<Vec<&str>> {
    if key.contains('\0') {
        return Err(invalid(key, "contains a NUL byte"));
    }
    if key.contains('\\') {
        return Err(invalid(key, "backslash is not a key separator"));
    }
    if key.starts_with('/') {
        return Err(invalid(key, "absolute keys are not allowed"));
    }

    let mut out = Vec::new();
    for segment in key.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid(key, "parent segments are not allowed")),
            s if s.starts_with(TEMP_PREFIX) => {
                return Err(invalid(key, "name uses the reserved temp-file prefix"))
            }
            _ => {}
        }

        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => out.push(segment),
            _ => return Err(invalid(key, "segment is not a plain name")),
        }
    }

    if out.is_empty() && !allow_empty {
        return Err(invalid(key, "key names no entry"));
    }
    Ok(out)
}

fn invalid(key: &str, reason: &'static str) -> StorageError {
    StorageError::InvalidKey {
        key: key.to_string(),
        reason,
    }
}
