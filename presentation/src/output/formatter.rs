//! Output formatter trait

use advisor_domain::Session;

/// Trait for formatting analysis sessions
pub trait OutputFormatter {
    /// Every agent result followed by the recommendation
    fn format_full(&self, session: &Session) -> String;

    /// Recommendation only (concise output)
    fn format_summary(&self, session: &Session) -> String;

    /// Format as JSON
    fn format_json(&self, session: &Session) -> String;
}
