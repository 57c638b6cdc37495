// Multi-digest directory scanner
// Walks a tree, digests every eligible file in one pass per file, writes a CSV report

pub mod digest;
pub mod error;
pub mod path_utils;
pub mod report;
pub mod scan;
pub mod skip;
pub mod walker;

// Re-export commonly used types for convenience
pub use digest::{Algorithm, DigestEngine, DigestSet, FanOutWriter, FileDigest, Hasher};
pub use error::HashSumError;
pub use report::{report_file_name, ReportWriter};
pub use scan::{ScanEngine, ScanProgress, ScanStats};
pub use skip::SkipRule;
pub use walker::{FileRecord, ScanError, ScanOutcome, TreeScanner};
