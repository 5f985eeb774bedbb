//! rf-mapcheck: batch validation of map data files
//!
//! Loads every JSON file under the given paths, resolves inheritance and
//! collects the diagnostics. The `rf-mapcheck` binary is a thin wrapper.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use rf_mapdata::{ConfigError, Diagnostics, LoadError, MapData, MapDataConfig};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("{path}: {source}")]
    Load { path: String, source: LoadError },

    #[error("cannot read directory {path}: {message}")]
    Walk { path: String, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Files or directories, loaded in order
    pub paths: Vec<PathBuf>,
    /// Loader configuration file
    pub config: Option<PathBuf>,
    /// Source tag for every loaded file; the configured core source if unset
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub diagnostics: Diagnostics,
    pub files: usize,
    pub records: usize,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// One line per diagnostic
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        for entry in self.diagnostics.iter() {
            writeln!(out, "{}", entry)?;
        }
        Ok(())
    }
}

pub fn run(options: &CheckOptions) -> Result<CheckReport, CheckError> {
    let config = match &options.config {
        Some(path) => MapDataConfig::load_from_file(path)?,
        None => MapDataConfig::default(),
    };
    let source = options
        .source
        .clone()
        .unwrap_or_else(|| config.core_source.clone());

    let mut files = Vec::new();
    for path in &options.paths {
        collect_json_files(path, &mut files)?;
    }

    let mut data = MapData::new(config);
    let mut diagnostics = Diagnostics::new();
    let mut records = 0;
    for file in &files {
        records += data
            .load_file(file, &source, &mut diagnostics)
            .map_err(|source| CheckError::Load {
                path: file.display().to_string(),
                source,
            })?;
    }
    data.finalize(&mut diagnostics);
    data.check(&mut diagnostics);

    log::info!(
        "{} records from {} files: {} terrain, {} furniture",
        records,
        files.len(),
        data.terrain().size() - 1,
        data.furniture().size() - 1
    );
    Ok(CheckReport {
        diagnostics,
        files: files.len(),
        records,
    })
}

/// Depth-first, sorted so load order does not depend on the filesystem.
/// A path that is not a directory is taken as given.
pub fn collect_json_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), CheckError> {
    if !path.is_dir() {
        files.push(path.to_path_buf());
        return Ok(());
    }
    let walk_error = |e: io::Error| CheckError::Walk {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut entries = fs::read_dir(path)
        .map_err(walk_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(walk_error)?;
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            collect_json_files(&entry, files)?;
        } else if entry.extension().is_some_and(|ext| ext == "json") {
            files.push(entry);
        }
    }
    Ok(())
}
