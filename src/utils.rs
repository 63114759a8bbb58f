use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;

use crate::error::{IconError, Result};

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// so `path` is either the old content or the complete new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| IconError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| IconError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| IconError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| IconError::io(path, e.error))?;
    Ok(())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn format_bytes(len: u64) -> String {
    if len < 1024 {
        format!("{} B", len)
    } else if len < 1024 * 1024 {
        format!("{:.1} KiB", len as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", len as f64 / (1024.0 * 1024.0))
    }
}

pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else {
        let minutes = (seconds / 60.0) as u64;
        let remaining_seconds = seconds % 60.0;
        format!("{}m {:.1}s", minutes, remaining_seconds)
    }
}
