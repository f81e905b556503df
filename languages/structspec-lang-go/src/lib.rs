//! Go language support for structspec
//!
//! [`GoPackageSource`] implements [`DeclarationSource`] for one directory of Go
//! files (a Go package). Files are parsed with tree-sitter-go ([`parser`]) and
//! struct tags are decoded with Go struct tag rules ([`tags`]).

pub mod parser;
pub mod tags;

use glob::Pattern;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use structspec_foundation::{DeclarationSource, StructRecord, StructSpecError, StructSpecResult};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Struct declarations of the Go files in one directory.
///
/// The directory is read non-recursively, in file name order. `_test.go` files,
/// files excluded with `//go:build ignore` and the generated output file never
/// contribute declarations.
#[derive(Debug, Clone)]
pub struct GoPackageSource {
    dir: PathBuf,
    file_patterns: Vec<Pattern>,
    skip_file: Option<PathBuf>,
}

impl GoPackageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_patterns: Vec::new(),
            skip_file: None,
        }
    }

    /// Only read files whose name matches at least one glob (`*`, `model_*.go`, ...).
    ///
    /// An empty list reads every Go file.
    pub fn with_file_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> StructSpecResult<Self> {
        self.file_patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Pattern::new(pattern).map_err(|e| {
                    StructSpecError::config(format!("invalid files pattern '{}': {}", pattern, e))
                })
            })
            .collect::<StructSpecResult<Vec<_>>>()?;
        Ok(self)
    }

    /// Never read `path`, typically the file the output will be written to
    pub fn skipping(mut self, path: Option<&Path>) -> Self {
        self.skip_file = path.map(normalize_path);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Non-test `.go` files of the directory, sorted by name, output file excluded
    fn go_files(&self) -> StructSpecResult<Vec<PathBuf>> {
        let metadata = std::fs::metadata(&self.dir)
            .map_err(|e| StructSpecError::io("read source directory", &self.dir, e))?;
        if !metadata.is_dir() {
            return Err(StructSpecError::config(format!(
                "source path '{}' is not a directory",
                self.dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                StructSpecError::io("read source directory", path, source)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(".go") || name.ends_with("_test.go") {
                continue;
            }

            if let Some(skip) = &self.skip_file {
                if normalize_path(entry.path()) == *skip {
                    debug!(path = %entry.path().display(), "Skipping output file");
                    continue;
                }
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }

    fn matches_file_patterns(&self, path: &Path) -> bool {
        if self.file_patterns.is_empty() {
            return true;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.file_patterns.iter().any(|p| p.matches(&name))
    }
}

impl DeclarationSource for GoPackageSource {
    fn package_name(&self) -> StructSpecResult<String> {
        let mut found: Option<(String, PathBuf)> = None;

        for path in self.go_files()? {
            let Some(source) = read_buildable_source(&path)? else {
                continue;
            };
            let Some(name) = parser::parse_package_name(&source, &path)? else {
                continue;
            };

            if let Some((first, first_path)) = &found {
                if *first != name {
                    return Err(StructSpecError::parse(
                        path.display().to_string(),
                        format!(
                            "found packages {} ({}) and {} ({}) in {}",
                            first,
                            first_path.display(),
                            name,
                            path.display(),
                            self.dir.display()
                        ),
                    ));
                }
                continue;
            }

            found = Some((name, path));
        }

        found.map(|(name, _)| name).ok_or_else(|| {
            StructSpecError::parse(
                self.dir.display().to_string(),
                "has no Go packages in source directory",
            )
        })
    }

    fn structs(&self) -> StructSpecResult<Vec<StructRecord>> {
        let files: Vec<PathBuf> = self
            .go_files()?
            .into_iter()
            .filter(|path| self.matches_file_patterns(path))
            .collect();

        if files.is_empty() {
            warn!(dir = %self.dir.display(), "No Go files matched in source directory");
        }

        let mut structs = Vec::new();
        let mut declared_at: HashMap<String, String> = HashMap::new();
        for path in &files {
            let Some(source) = read_buildable_source(path)? else {
                continue;
            };
            let file_structs = parser::parse_located_structs(&source, path)?;
            debug!(
                path = %path.display(),
                structs = file_structs.len(),
                "Parsed Go file"
            );

            for located in file_structs {
                let location = format!("{}:{}:{}", path.display(), located.line, located.column);
                if let Some(first) = declared_at.get(&located.record.name) {
                    // Each name becomes one `<Name>Spec` variable
                    return Err(StructSpecError::parse(
                        location,
                        format!(
                            "struct '{}' is also declared at {}",
                            located.record.name, first
                        ),
                    ));
                }
                declared_at.insert(located.record.name.clone(), location);
                structs.push(located.record);
            }
        }

        info!(
            dir = %self.dir.display(),
            files = files.len(),
            structs = structs.len(),
            "Extracted struct declarations"
        );

        Ok(structs)
    }
}

fn read_source(path: &Path) -> StructSpecResult<String> {
    std::fs::read_to_string(path).map_err(|e| StructSpecError::io("read file", path, e))
}

/// File content, or `None` when the file is excluded from every build
fn read_buildable_source(path: &Path) -> StructSpecResult<Option<String>> {
    let source = read_source(path)?;
    if parser::is_build_ignored(&source) {
        debug!(path = %path.display(), "Skipping file with ignore build constraint");
        return Ok(None);
    }
    Ok(Some(source))
}

/// Canonical form of `path`, also for files that do not exist yet
fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}
