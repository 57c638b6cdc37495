// Scan orchestration
// Drives the tree scanner, writes the report and collects statistics

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::digest::DigestEngine;
use super::error::HashSumError;
use super::report::ReportWriter;
use super::skip::SkipRule;
use super::walker::{Candidate, ScanError, ScanOutcome, TreeScanner};

/// Statistics collected during a scan
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_bytes: u64,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
}

impl ScanStats {
    /// Throughput in MB/s, zero for instantaneous scans
    pub fn throughput_mbps(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.total_bytes as f64 / 1_048_576.0) / secs
        } else {
            0.0
        }
    }
}

// Helper function to serialize Duration as seconds
fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Progress information emitted after each file
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub processed: usize,
    pub failed: usize,
    pub current_file: String,
}

/// Type alias for progress callback function
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

/// Engine for scanning a directory into a digest report
pub struct ScanEngine {
    engine: DigestEngine,
    skip_rule: SkipRule,
    parallel: bool,
    progress_callback: Option<Arc<ProgressCallback>>,
}

impl ScanEngine {
    /// Create a new sequential ScanEngine with the default skip rule
    pub fn new() -> Self {
        Self {
            engine: DigestEngine::new(),
            skip_rule: SkipRule::default(),
            parallel: false,
            progress_callback: None,
        }
    }

    /// Digest files on the rayon pool; report order is unchanged
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_skip_rule(mut self, skip_rule: SkipRule) -> Self {
        self.skip_rule = skip_rule;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.engine = DigestEngine::with_buffer_size(buffer_size);
        self
    }

    /// Set a progress callback function
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(ScanProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Scanner configured like this engine
    pub fn scanner(&self, root: &Path) -> TreeScanner {
        TreeScanner::new(root)
            .with_skip_rule(self.skip_rule.clone())
            .with_engine(self.engine.clone())
    }

    /// Number of files a scan of `root` into `output` would digest
    ///
    /// Applies the same exclusions as [`ScanEngine::scan_to_file`]. Walk
    /// failures are not counted; they show up only in `files_failed`.
    ///
    /// # Errors
    /// Fails when the root cannot be walked.
    pub fn count_files(&self, root: &Path, output: &Path) -> Result<usize, HashSumError> {
        self.scanner(root).with_excluded_path(output).count_eligible()
    }

    /// Scan `root` and write the report to a freshly created `output`
    ///
    /// The output file is never digested, even when it lies inside `root`.
    ///
    /// # Errors
    /// Fails when the root cannot be walked or the report cannot be written.
    /// The output file is only created once the root has been checked.
    pub fn scan_to_file(&self, root: &Path, output: &Path) -> Result<ScanStats, HashSumError> {
        let scanner = self.scanner(root);
        // Surface walk errors before truncating anything
        scanner.candidates()?;

        let file = File::create(output).map_err(|source| HashSumError::ReportWrite {
            path: output.to_path_buf(),
            source,
        })?;
        let scanner = scanner.with_excluded_path(output);

        info!(root = %root.display(), output = %output.display(), "scanning");
        self.run(&scanner, BufWriter::new(file), output)
    }

    /// Scan `root` and write the report to `writer`
    ///
    /// # Errors
    /// Fails when the root cannot be walked or the report cannot be written.
    pub fn scan_to_writer<W: Write>(&self, root: &Path, writer: W) -> Result<ScanStats, HashSumError> {
        let scanner = self.scanner(root);
        info!(root = %root.display(), "scanning");
        self.run(&scanner, writer, Path::new("<writer>"))
    }

    fn run<W: Write>(
        &self,
        scanner: &TreeScanner,
        writer: W,
        report_path: &Path,
    ) -> Result<ScanStats, HashSumError> {
        let start_time = Instant::now();
        let report_error = |source| HashSumError::ReportWrite {
            path: report_path.to_path_buf(),
            source,
        };

        // Walk first so a missing root never produces a header
        let outcomes: Box<dyn Iterator<Item = ScanOutcome> + '_> = if self.parallel {
            Box::new(self.digest_parallel(scanner)?.into_iter())
        } else {
            Box::new(scanner.scan()?)
        };

        let mut report = ReportWriter::new(writer).map_err(report_error)?;
        let mut tally = Tally::default();

        for outcome in outcomes {
            match outcome {
                Ok(record) => {
                    report.write_record(&record).map_err(report_error)?;
                    tally.processed += 1;
                    tally.bytes += record.size;
                    if !self.parallel {
                        self.emit_progress(tally.processed, tally.failed, record.relative_path);
                    }
                }
                Err(ScanError { path, error }) => {
                    warn!(path = %path, "{}", first_line(&error));
                    tally.failed += 1;
                    if !self.parallel {
                        self.emit_progress(tally.processed, tally.failed, path);
                    }
                }
            }
        }

        report.finish().map_err(report_error)?;

        let stats = ScanStats {
            files_processed: tally.processed,
            files_failed: tally.failed,
            total_bytes: tally.bytes,
            duration: start_time.elapsed(),
        };
        debug!(?stats, "scan finished");
        Ok(stats)
    }

    /// Digest all candidates in parallel, keeping walk order
    ///
    /// Progress is reported by the workers as each file completes, so the
    /// counts grow while the pool is busy rather than after it drains.
    fn digest_parallel(&self, scanner: &TreeScanner) -> Result<Vec<ScanOutcome>, HashSumError> {
        let candidates: Vec<Result<Candidate, ScanError>> = scanner.candidates()?.collect();
        debug!(count = candidates.len(), "digesting in parallel");

        let processed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        // par_iter over a Vec is indexed, so collect keeps the input order
        Ok(candidates
            .into_par_iter()
            .map(|candidate| {
                let outcome = candidate.and_then(|c| scanner.digest(c));
                if self.progress_callback.is_some() {
                    match &outcome {
                        Ok(record) => {
                            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                            self.emit_progress(
                                done,
                                failed.load(Ordering::Relaxed),
                                record.relative_path.clone(),
                            );
                        }
                        Err(error) => {
                            let done = failed.fetch_add(1, Ordering::Relaxed) + 1;
                            self.emit_progress(
                                processed.load(Ordering::Relaxed),
                                done,
                                error.path.clone(),
                            );
                        }
                    }
                }
                outcome
            })
            .collect())
    }

    fn emit_progress(&self, processed: usize, failed: usize, current_file: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(ScanProgress {
                processed,
                failed,
                current_file,
            });
        }
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Tally {
    processed: usize,
    failed: usize,
    bytes: u64,
}

fn first_line(error: &HashSumError) -> String {
    error.to_string().lines().next().unwrap_or_default().to_string()
}

/// Default output location: the report file name in the current directory
pub fn default_output(root: &Path) -> PathBuf {
    PathBuf::from(super::report::report_file_name(root))
}
