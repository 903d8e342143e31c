//! Human-readable audit log kept on a configuration.

use chrono::{DateTime, Utc};

/// Appends timestamped sections to a configuration log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    text: String,
}

impl AuditLog {
    /// Continues an existing log.
    #[must_use]
    pub fn resume(existing: &str) -> Self {
        Self {
            text: existing.to_string(),
        }
    }

    /// Starts a section stamped with the current time.
    pub fn section(&mut self, title: &str) -> &mut Self {
        self.section_at(Utc::now(), title)
    }

    /// Starts a section stamped with `at`.
    pub fn section_at(&mut self, at: DateTime<Utc>, title: &str) -> &mut Self {
        self.text.push_str(&format!(
            "\n*** {}: {title}\n",
            at.format("%a %b %e %H:%M:%S %Y")
        ));
        self
    }

    /// Appends one line.
    pub fn line(&mut self, entry: &str) -> &mut Self {
        self.text.push_str(entry);
        self.text.push('\n');
        self
    }

    /// Returns the full log.
    #[must_use]
    pub fn finish(self) -> String {
        self.text
    }
}
