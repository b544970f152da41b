//! Structured error types for the folio rendering engine.
//!
//! Only a handful of things can actually fail a render: malformed JSON input,
//! an impossible layout configuration, and a document that would need more
//! pages than the configured ceiling. Everything else (missing fields,
//! unknown status keys, overlong labels) has a visual fallback and never
//! reaches this type.

use thiserror::Error;

/// The unified error type returned by all public folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a valid report.
    #[error("failed to parse report: {source}{}", fmt_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Layout would need more pages than the configured ceiling.
    #[error("page limit exceeded: the document needs more than {limit} pages")]
    PageLimitExceeded { limit: usize },

    /// A single indivisible block is taller than an empty page.
    #[error("block of height {needed:.2} cannot fit on a page with {available:.2} of printable height")]
    BlockTooTall { needed: f64, available: f64 },

    /// The layout configuration makes layout impossible.
    #[error("invalid layout config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn fmt_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check block \"type\" tags and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("failed to parse report"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn page_limit_message_names_the_limit() {
        let err = FolioError::PageLimitExceeded { limit: 12 };
        assert!(err.to_string().contains("12"));
    }
}
