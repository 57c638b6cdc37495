// CSV report writer
// Header first, then one line per digested file in walk order

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use super::digest::Algorithm;
use super::walker::FileRecord;

/// Title of the path column
pub const PATH_COLUMN: &str = "文件路径";

/// Report file name used when scanning the current directory
pub const CURRENT_DIR_REPORT: &str = "HashSum_result_current.csv";

/// Report file name used when the scan root is a filesystem root
pub const ROOT_DIR_REPORT: &str = "HashSum_result_root.csv";

/// Full header line, without the line ending
pub fn header() -> String {
    let mut line = String::from(PATH_COLUMN);
    for algorithm in Algorithm::ALL {
        line.push(',');
        line.push_str(algorithm.name());
    }
    line
}

/// Format one record as a report line, without the line ending
pub fn format_record(record: &FileRecord) -> String {
    let mut line = escape_field(&record.relative_path).into_owned();
    for (_, digest) in record.digests.iter() {
        line.push(',');
        line.push_str(digest);
    }
    line
}

/// Quote a field only when it would break the row
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Default report file name for a scan root
///
/// Every name produced here starts with "HashSum", so later scans skip it.
/// Roots without a base name of their own ("..", "a/..") are named after the
/// directory they resolve to; a filesystem root becomes `HashSum_result_root.csv`.
pub fn report_file_name(root: &Path) -> String {
    if root == Path::new(".") {
        return CURRENT_DIR_REPORT.to_string();
    }
    let base = root.file_name().map(|name| name.to_os_string()).or_else(|| {
        root.canonicalize()
            .ok()
            .and_then(|resolved| resolved.file_name().map(|name| name.to_os_string()))
    });
    match base {
        Some(base) => format!("HashSum_result_{}.csv", base.to_string_lossy()),
        None => ROOT_DIR_REPORT.to_string(),
    }
}

/// Streams report lines to any sink
pub struct ReportWriter<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Wrap `writer` and write the header line
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", header())?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_record(&mut self, record: &FileRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", format_record(record))?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
