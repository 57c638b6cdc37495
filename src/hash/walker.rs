//! Tree scanner: walks a directory and digests every eligible file
//!
//! The walk is depth-first with siblings visited in file-name order, so two
//! scans of an unchanged tree yield the same sequence on every platform.
//! Only regular files are eligible. Symlinks are not followed and, like
//! sockets, fifos and devices, are never digested.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{DirEntryIter, Parallelism, WalkDir};
use tracing::{debug, trace};

use super::digest::{DigestEngine, DigestSet};
use super::error::HashSumError;
use super::path_utils;
use super::skip::SkipRule;

/// Digests of one file, keyed by its path relative to the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub relative_path: String,
    pub digests: DigestSet,
    pub size: u64,
}

/// A file or directory that could not be processed; the walk goes on
#[derive(Debug)]
pub struct ScanError {
    pub path: String,
    pub error: HashSumError,
}

/// One item of a scan
pub type ScanOutcome = Result<FileRecord, ScanError>;

/// A file selected for digesting
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    pub relative_path: String,
}

/// Scanner for digesting every eligible file below a root directory
#[derive(Debug, Clone)]
pub struct TreeScanner {
    root: PathBuf,
    skip_rule: SkipRule,
    engine: DigestEngine,
    excluded: Option<PathBuf>,
}

impl TreeScanner {
    /// Create a new scanner with the default skip rule
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skip_rule: SkipRule::default(),
            engine: DigestEngine::default(),
            excluded: None,
        }
    }

    pub fn with_skip_rule(mut self, skip_rule: SkipRule) -> Self {
        self.skip_rule = skip_rule;
        self
    }

    pub fn with_engine(mut self, engine: DigestEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Never yield this file, whatever its name
    ///
    /// Used for the report being written when it lives inside the tree.
    pub fn with_excluded_path(mut self, path: &Path) -> Self {
        self.excluded = Some(path_utils::absolute_path(path));
        self
    }

    /// Get the root directory being scanned
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily enumerate eligible files without reading them
    ///
    /// # Errors
    /// Fails when the root is missing, unreadable or not a directory.
    pub fn candidates(&self) -> Result<Candidates, HashSumError> {
        check_root(&self.root)?;

        let walk = WalkDir::new(&self.root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false);

        Ok(Candidates {
            inner: walk.into_iter(),
            root: self.root.clone(),
            skip_rule: self.skip_rule.clone(),
            excluded: self.excluded.as_deref().map(ExcludedFile::new),
        })
    }

    /// Count eligible files with a separate walk, for progress display
    pub fn count_eligible(&self) -> Result<usize, HashSumError> {
        Ok(self.candidates()?.filter(Result::is_ok).count())
    }

    /// Walk the tree and digest every eligible file in walk order
    ///
    /// Each call performs a fresh walk.
    ///
    /// # Errors
    /// Fails before yielding anything when the root cannot be walked.
    /// Per-file failures are yielded as [`ScanError`] items instead.
    pub fn scan(&self) -> Result<impl Iterator<Item = ScanOutcome> + '_, HashSumError> {
        let candidates = self.candidates()?;
        Ok(candidates.map(move |candidate| candidate.and_then(|c| self.digest(c))))
    }

    /// Digest a single candidate produced by [`TreeScanner::candidates`]
    pub fn digest(&self, candidate: Candidate) -> ScanOutcome {
        trace!(path = %candidate.path.display(), "digesting");
        match self.engine.compute_file(&candidate.path) {
            Ok(file_digest) => Ok(FileRecord {
                relative_path: candidate.relative_path,
                digests: file_digest.digests,
                size: file_digest.size,
            }),
            Err(error) => Err(ScanError {
                path: candidate.relative_path,
                error,
            }),
        }
    }
}

fn check_root(root: &Path) -> Result<(), HashSumError> {
    let metadata = fs::metadata(root).map_err(|e| walk_error(root, e))?;
    if !metadata.is_dir() {
        return Err(HashSumError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|e| walk_error(root, e))?;
    Ok(())
}

fn walk_error(root: &Path, err: io::Error) -> HashSumError {
    match err.kind() {
        io::ErrorKind::NotFound => HashSumError::DirectoryNotFound {
            path: root.to_path_buf(),
        },
        _ => HashSumError::Walk {
            path: root.to_path_buf(),
            reason: err.to_string(),
        },
    }
}

/// Report file to leave out, compared by name first and canonical path second
#[derive(Debug)]
struct ExcludedFile {
    file_name: Option<std::ffi::OsString>,
    absolute: PathBuf,
}

impl ExcludedFile {
    fn new(absolute: &Path) -> Self {
        let absolute = absolute
            .canonicalize()
            .unwrap_or_else(|_| absolute.to_path_buf());
        Self {
            file_name: absolute.file_name().map(OsStr::to_os_string),
            absolute,
        }
    }

    fn matches(&self, path: &Path, file_name: &OsStr) -> bool {
        if self.file_name.as_deref() != Some(file_name) {
            return false;
        }
        path.canonicalize()
            .map(|canonical| canonical == self.absolute)
            .unwrap_or(false)
    }
}

/// Lazy sequence of eligible files in walk order
pub struct Candidates {
    inner: DirEntryIter<((), ())>,
    root: PathBuf,
    skip_rule: SkipRule,
    excluded: Option<ExcludedFile>,
}

impl Candidates {
    fn walk_failure(&self, path: PathBuf, err: &jwalk::Error) -> ScanError {
        ScanError {
            path: path_utils::relative_report_path(&path, &self.root),
            error: HashSumError::Walk {
                path,
                reason: err.to_string(),
            },
        }
    }
}

impl Iterator for Candidates {
    type Item = Result<Candidate, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(self.walk_failure(path, &err)));
                }
            };

            // A directory whose listing failed still arrives as an entry
            if let Some(err) = entry.read_children_error.take() {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| entry.path());
                return Some(Err(self.walk_failure(path, &err)));
            }

            if entry.depth() == 0 || !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name();
            if self.skip_rule.should_skip(&file_name.to_string_lossy()) {
                debug!(file = %file_name.to_string_lossy(), "skipping by name");
                continue;
            }

            let path = entry.path();
            if let Some(ref excluded) = self.excluded {
                if excluded.matches(&path, file_name) {
                    debug!(path = %path.display(), "skipping report output");
                    continue;
                }
            }

            return Some(Ok(Candidate {
                relative_path: path_utils::relative_report_path(&path, &self.root),
                path,
            }));
        }
    }
}
