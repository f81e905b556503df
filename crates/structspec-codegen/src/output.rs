//! Writing generated text to stdout or to a file

use std::io::Write;
use std::path::{Path, PathBuf};
use structspec_foundation::{StructSpecError, StructSpecResult};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Where the generated text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `Stdout` when no path is configured
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(OutputTarget::Stdout, OutputTarget::File)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path),
        }
    }
}

/// Send `body` to the target
pub fn emit(body: &str, target: &OutputTarget) -> StructSpecResult<()> {
    match target {
        OutputTarget::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_to(&mut handle, body)
        }
        OutputTarget::File(path) => write_file_atomic(path, body),
    }
}

/// Write `body` to an arbitrary writer, flushing at the end
pub fn write_to<W: Write>(writer: &mut W, body: &str) -> StructSpecResult<()> {
    writer
        .write_all(body.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| StructSpecError::io("write", "<stdout>", e))
}

/// Replace `path` with `body`.
///
/// Parent directories are created first. The text is written to a temporary
/// file in the target directory and renamed over `path`, so readers never see a
/// partially written file.
pub fn write_file_atomic(path: &Path, body: &str) -> StructSpecResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.exists() {
        debug!(dir = %dir.display(), "Creating output directory");
        std::fs::create_dir_all(dir)
            .map_err(|e| StructSpecError::io("create directory", dir, e))?;
    }

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| StructSpecError::io("create temporary file in", dir, e))?;
    tmp.write_all(body.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| StructSpecError::io("write temporary file for", path, e))?;
    tmp.persist(path)
        .map_err(|e| StructSpecError::io("write output file", path, e.error))?;

    info!(path = %path.display(), bytes = body.len(), "Wrote generated file");
    Ok(())
}
