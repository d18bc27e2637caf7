/// Disc verification log

use std::fmt;

/// Severity of a verification log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Diagnostic information
    Inform,
    /// Recoverable inconsistency in the disc structure
    Warning,
    /// Identification failure or unrecoverable inconsistency
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Inform => write!(f, "Inform"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

/// A single verification log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Entry severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

/// Append-only record of everything noticed while decoding a disc
///
/// Entries never abort decoding; callers decide whether a warning or
/// error should be treated as a failure.
#[derive(Debug, Clone, Default)]
pub struct VerificationLog {
    entries: Vec<LogEntry>,
}

impl VerificationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push<S: Into<String>>(&mut self, severity: Severity, message: S) {
        let message = message.into();
        match severity {
            Severity::Inform => tracing::debug!(%severity, "{}", message),
            Severity::Warning | Severity::Error => tracing::warn!(%severity, "{}", message),
        }
        self.entries.push(LogEntry { severity, message });
    }

    /// Append an informational entry
    pub fn inform<S: Into<String>>(&mut self, message: S) {
        self.push(Severity::Inform, message);
    }

    /// Append a warning
    pub fn warning<S: Into<String>>(&mut self, message: S) {
        self.push(Severity::Warning, message);
    }

    /// Append an error
    pub fn error<S: Into<String>>(&mut self, message: S) {
        self.push(Severity::Error, message);
    }

    /// All entries in the order they were logged
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries of one severity
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    /// Check there are no warnings or errors
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.severity == Severity::Inform)
    }
}

impl fmt::Display for VerificationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            writeln!(f, "All objects located.")?;
        }
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.severity, entry.message)?;
        }
        Ok(())
    }
}
