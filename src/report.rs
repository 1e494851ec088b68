//! Storage usage report
//!
//! Best-effort diagnostics, not part of the data model: filesystem totals via
//! `statvfs` plus the ten largest entries under the workspace directory.
//! Status tiers at 70% (warning) and 90% (critical) used space.

use std::path::Path;

use serde::Serialize;

use crate::types::{HearthError, Result};

const TOP_ENTRIES: usize = 10;
const WARNING_PERCENT: f64 = 70.0;
const CRITICAL_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageReport {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub used_percent: f64,
    pub status: &'static str,
    pub entries: Vec<WorkspaceEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEntry {
    pub name: String,
    pub bytes: u64,
}

/// Build the report for the filesystem holding `workspace`.
pub fn storage_report(workspace: &Path) -> Result<StorageReport> {
    let (total_bytes, available_bytes) = filesystem_usage(workspace)?;
    let used_bytes = total_bytes.saturating_sub(available_bytes);
    let used_percent = if total_bytes > 0 {
        (used_bytes as f64 / total_bytes as f64) * 100.0
    } else {
        0.0
    };

    Ok(StorageReport {
        total_bytes,
        used_bytes,
        available_bytes,
        used_percent: (used_percent * 10.0).round() / 10.0,
        status: tier(used_percent),
        entries: largest_entries(workspace, TOP_ENTRIES),
    })
}

fn tier(used_percent: f64) -> &'static str {
    if used_percent >= CRITICAL_PERCENT {
        "critical"
    } else if used_percent >= WARNING_PERCENT {
        "warning"
    } else {
        "ok"
    }
}

/// Total and available bytes of the filesystem holding `path` via `statvfs`.
#[cfg(unix)]
fn filesystem_usage(path: &Path) -> Result<(u64, u64)> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| HearthError::Internal(format!("invalid path for statvfs: {}", e)))?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if ret != 0 {
        return Err(HearthError::Internal(format!(
            "statvfs {}: {}",
            path.display(),
            std::io::Error::last_os_error()
        )));
    }

    // f_frsize = fundamental block size; f_bavail = blocks available to
    // unprivileged users. Casts cover platforms where these are not u64.
    let frsize: u64 = stat.f_frsize as _;
    let blocks: u64 = stat.f_blocks as _;
    let bavail: u64 = stat.f_bavail as _;
    Ok((blocks * frsize, bavail * frsize))
}

#[cfg(not(unix))]
fn filesystem_usage(_path: &Path) -> Result<(u64, u64)> {
    // No statvfs off unix; report empty totals rather than failing the
    // endpoint (the entries walk still works).
    Ok((0, 0))
}

/// The `limit` largest immediate entries under `dir`, directories sized
/// recursively. Unreadable entries count as zero.
fn largest_entries(dir: &Path, limit: usize) -> Vec<WorkspaceEntry> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut sized: Vec<WorkspaceEntry> = entries
        .flatten()
        .map(|entry| WorkspaceEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            bytes: entry_size(&entry.path()),
        })
        .collect();

    sized.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
    sized.truncate(limit);
    sized
}

fn entry_size(path: &Path) -> u64 {
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return 0;
    };
    if meta.is_file() {
        return meta.len();
    }
    if !meta.is_dir() {
        // Symlinks and special files are not followed.
        return 0;
    }
    let Ok(entries) = std::fs::read_dir(path) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| entry_size(&entry.path()))
        .sum()
}
