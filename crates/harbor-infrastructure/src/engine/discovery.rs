//! Project discovery from the engine's history directory.
//!
//! The engine keeps one directory per working directory under
//! `<engine_home>/projects/`, named after the path with separators replaced
//! by `-` (`/work/api` becomes `-work-api`).

use super::transcript::TranscriptSummary;
use harbor_core::error::{HarborError, Result};
use harbor_core::project::Project;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of project directories considered.
const MAX_PROJECTS: usize = 1000;

/// Lists every project directory as a discovered project, sorted by id.
///
/// Returns an empty list when the projects directory does not exist.
///
/// # Errors
///
/// Returns `HarborError::AdapterFailure` if the projects directory exists but
/// cannot be read. Individual unreadable entries are logged and skipped.
pub fn scan_projects(projects_dir: &Path) -> Result<Vec<Project>> {
    scan_projects_capped(projects_dir, MAX_PROJECTS)
}

/// Keeps the first `max` directories by name so the cap is deterministic.
fn scan_projects_capped(projects_dir: &Path, max: usize) -> Result<Vec<Project>> {
    if !projects_dir.exists() {
        tracing::debug!(
            "[Discovery] No history directory at {}",
            projects_dir.display()
        );
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(projects_dir).map_err(|e| {
        HarborError::adapter(
            "discovery",
            format!("Failed to read {}: {}", projects_dir.display(), e),
        )
    })?;

    let mut dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("[Discovery] Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        if let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) {
            dirs.push((name, dir));
        }
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    if dirs.len() > max {
        tracing::warn!(
            "[Discovery] {} project directories, keeping the first {}",
            dirs.len(),
            max
        );
        dirs.truncate(max);
    }

    let mut projects = Vec::with_capacity(dirs.len());
    for (dir_name, dir) in dirs {
        let transcripts = match transcript_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(
                    "[Discovery] Failed to read project directory {}: {}",
                    dir.display(),
                    e
                );
                continue;
            }
        };

        let path = transcripts
            .iter()
            .find_map(|file| TranscriptSummary::read_cwd(file).ok().flatten())
            .unwrap_or_else(|| decode_dir_name(&dir_name));

        projects.push(Project::discovered(dir_name, path, Some(transcripts.len())));
    }

    tracing::debug!("[Discovery] Found {} projects", projects.len());
    Ok(projects)
}

/// `*.jsonl` files directly inside `dir`, sorted by name.
pub fn transcript_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl"))
        .collect();
    files.sort();
    Ok(files)
}

/// Best-effort inverse of the engine's directory naming.
///
/// Lossy: a `-` that was part of a path component also becomes `/`.
pub fn decode_dir_name(name: &str) -> PathBuf {
    PathBuf::from(name.replace('-', "/"))
}

/// The engine's directory name for a working directory.
pub fn encode_path(path: &Path) -> String {
    path.to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
