// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{LeagueError, Result};
use crate::types::RankedEntry;

fn partial_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        LeagueError::Configuration(format!("output path {} has no file name", path.display()))
    })?;
    let mut partial = name.to_os_string();
    partial.push(".partial");
    Ok(path.with_file_name(partial))
}

/// Removes the ranking a previous run left at `path`
///
/// Called before a run starts, so that a failed run leaves no ranking behind
/// that could be mistaken for its result.
pub fn clear_output(path: &Path) -> Result<()> {
    for stale in [path.to_path_buf(), partial_path(path)?] {
        match fs::remove_file(&stale) {
            Ok(()) => debug!("Removed stale output {}", stale.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(LeagueError::missing("output", stale, e)),
        }
    }
    Ok(())
}

/// Writes the ranking as `id<TAB>rank` lines, in ranking order
///
/// The file only appears at `path` once it is complete; a failed write leaves
/// nothing behind at `path`.
pub fn write_ranking(path: &Path, ranking: &[RankedEntry]) -> Result<()> {
    let partial = partial_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LeagueError::missing("output", parent, e))?;
    }

    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&partial)?);
        for entry in ranking {
            writeln!(writer, "{}\t{}", entry.id, entry.rank)?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()
    };
    if let Err(e) = write() {
        let _ = fs::remove_file(&partial);
        return Err(LeagueError::missing("output", &partial, e));
    }

    fs::rename(&partial, path).map_err(|e| LeagueError::missing("output", path, e))
}
