// Skip rule for report and manifest files
// Matches on the base name only, so prior reports in the tree are never digested

/// Prefixes that are always skipped
pub const DEFAULT_SKIP_PREFIXES: [&str; 2] = ["result_", "HashSum"];

/// Case-sensitive base-name prefix filter
#[derive(Debug, Clone)]
pub struct SkipRule {
    prefixes: Vec<String>,
}

impl SkipRule {
    pub fn new() -> Self {
        Self {
            prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Add extra prefixes on top of the defaults
    ///
    /// Empty prefixes are ignored, otherwise they would skip every file.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let prefix = prefix.into();
            if !prefix.is_empty() && !self.prefixes.contains(&prefix) {
                self.prefixes.push(prefix);
            }
        }
        self
    }

    /// True when a file with this base name must not be digested
    pub fn should_skip(&self, file_name: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for SkipRule {
    fn default() -> Self {
        Self::new()
    }
}
