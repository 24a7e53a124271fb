//! Export of a grouping's final contents as an in-memory tar.gz archive.

use std::io::Write;
use std::path::{Component, Path};

use serde::Serialize;
use thiserror::Error;

use crate::models::{Grouping, ProjectFile};

const ENTRY_MODE: u32 = 0o644;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    NothingToExport,
    #[error("Invalid archive entry name: {0}")]
    InvalidEntryName(String),
    #[error("Archive error: {0}")]
    Archive(#[from] std::io::Error),
}

/// One file as it will appear in the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportEntry {
    pub name: String,
    pub content: String,
}

/// Final content of every file, in upload order.
///
/// Documented content is used only when the file is included and was
/// documented; otherwise the original content is exported.
pub fn final_contents(files: &[ProjectFile]) -> Vec<ExportEntry> {
    files
        .iter()
        .map(|f| ExportEntry {
            name: f.name.clone(),
            content: f.final_content().to_string(),
        })
        .collect()
}

/// Download name for a grouping's archive.
pub fn archive_file_name(grouping: Grouping) -> String {
    format!("{}-documented.tar.gz", grouping.as_str())
}

/// True when `name` is a relative path that stays inside the archive root.
pub fn is_safe_entry_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('/') || name.starts_with('\\') {
        return false;
    }
    if name.split(&['/', '\\'][..]).any(|segment| segment == "..") {
        return false;
    }
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn validate_entry_name(name: &str) -> Result<(), ExportError> {
    if is_safe_entry_name(name) {
        Ok(())
    } else {
        Err(ExportError::InvalidEntryName(name.to_string()))
    }
}

/// Pack `entries` into a gzip-compressed tar archive.
pub fn build_archive(entries: &[ExportEntry]) -> Result<Vec<u8>, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    for entry in entries {
        validate_entry_name(&entry.name)?;
    }

    let mtime = chrono::Utc::now().timestamp().max(0) as u64;
    let mut tar_bytes = Vec::new();
    {
        let gz = flate2::write::GzEncoder::new(&mut tar_bytes, flate2::Compression::default());
        let mut tar = tar::Builder::new(gz);

        for entry in entries {
            let data = entry.content.as_bytes();
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(ENTRY_MODE);
            header.set_mtime(mtime);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_cksum();
            tar.append_data(&mut header, &entry.name, data)?;
        }

        tar.into_inner()?.finish()?.flush()?;
    }

    tracing::info!(
        entries = entries.len(),
        bytes = tar_bytes.len(),
        "Export archive built"
    );
    Ok(tar_bytes)
}
