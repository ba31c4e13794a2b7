//! Shallow directory scans used by the file, code and PDF modules.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
    pub size_bytes: u64,
}

/// Immediate children of `dir`, folders first, then by name.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        let meta = entry.metadata()?;
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            kind: if meta.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            },
            size_bytes: meta.len(),
        });
    }

    entries.sort_by(|a, b| {
        let rank = |e: &DirEntryInfo| (e.kind == EntryKind::File) as u8;
        rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}

#[derive(Debug, Clone)]
pub struct FileStats {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub lines: Option<usize>,
}

/// Files directly in `dir` whose extension (case-insensitive) is listed.
pub fn files_with_extensions(dir: &Path, extensions: &[&str]) -> Result<Vec<FileStats>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if !matches {
            continue;
        }

        files.push(FileStats {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().to_string(),
            size_bytes: entry.metadata()?.len(),
            lines: None,
        });
    }
    Ok(files)
}

/// Number of lines in a text file; `None` if it cannot be read as text.
pub fn count_lines(path: &Path) -> Option<usize> {
    let file = fs::File::open(path).ok()?;
    let mut count = 0;
    for line in BufReader::new(file).lines() {
        line.ok()?;
        count += 1;
    }
    Some(count)
}
