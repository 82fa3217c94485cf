//! Error accumulation grouped by source

use indexmap::IndexMap;

use crate::error::{ErrorKind, LoadError};

/// Errors grouped by the file path or image reference that produced them
///
/// Sources keep the order in which they first reported an error. The report
/// is only ever appended to.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Errors grouped by source (IndexMap preserves insertion order)
    pub errors_by_source: IndexMap<String, Vec<LoadError>>,

    /// Total error count
    pub total_errors: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error for a specific source
    pub fn add_error(&mut self, source: impl Into<String>, error: LoadError) {
        self.errors_by_source
            .entry(source.into())
            .or_default()
            .push(error);
        self.total_errors += 1;
    }

    /// Add several errors for one source, keeping their order
    pub fn add_errors(&mut self, source: impl Into<String>, errors: Vec<LoadError>) {
        if errors.is_empty() {
            return;
        }
        self.total_errors += errors.len();
        self.errors_by_source
            .entry(source.into())
            .or_default()
            .extend(errors);
    }

    /// Append every error of another report
    pub fn merge(&mut self, other: LoadReport) {
        for (source, errors) in other.errors_by_source {
            self.add_errors(source, errors);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Number of distinct sources with at least one error
    pub fn sources_with_errors(&self) -> usize {
        self.errors_by_source.len()
    }

    pub fn errors_for(&self, source: &str) -> &[LoadError] {
        self.errors_by_source
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoadError)> {
        self.errors_by_source
            .iter()
            .flat_map(|(source, errors)| errors.iter().map(move |e| (source.as_str(), e)))
    }

    /// Count errors of one kind across all sources
    pub fn count_kind(&self, kind: ErrorKind) -> usize {
        self.iter().filter(|(_, e)| e.kind() == kind).count()
    }

    /// Generate summary message: "5 errors in 3 sources"
    pub fn summary(&self) -> String {
        let source_word = if self.sources_with_errors() == 1 {
            "source"
        } else {
            "sources"
        };
        let error_word = if self.total_errors == 1 {
            "error"
        } else {
            "errors"
        };
        format!(
            "{} {} in {} {}",
            self.total_errors,
            error_word,
            self.sources_with_errors(),
            source_word
        )
    }
}
