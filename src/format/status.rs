//! Status and urgency styling.
//!
//! Status keys arrive as free-form strings. The known vocabulary is a closed
//! enum with an explicit `Unknown` arm; deployments may extend or override it
//! through [`LayoutConfig::statuses`](crate::config::LayoutConfig), which is
//! consulted first. Anything still unmatched renders with the uppercased key
//! and a neutral color.

use std::collections::BTreeMap;

use crate::config::StatusOverride;
use crate::model::{Thresholds, Urgency};
use crate::style::{palette, Color};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Paid,
    Eligible,
    Pending,
    Processing,
    Overdue,
    Blocked,
    Ineligible,
    Cancelled,
    Unknown(String),
}

/// Resolved presentation for a status key.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusStyle {
    pub label: String,
    pub color: Color,
    pub icon: String,
    /// False when the key fell through to the neutral fallback.
    pub known: bool,
}

/// Lowercase, trim, and unify separators so `"In Progress"`, `"in-progress"`
/// and `"IN_PROGRESS"` are the same key.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

impl StatusKind {
    pub fn from_key(key: &str) -> Self {
        match normalize_key(key).as_str() {
            "active" | "ok" => Self::Active,
            "paid" | "settled" => Self::Paid,
            "eligible" | "approved" => Self::Eligible,
            "pending" | "awaiting" | "open" => Self::Pending,
            "processing" | "in_progress" => Self::Processing,
            "overdue" | "late" => Self::Overdue,
            "blocked" | "suspended" => Self::Blocked,
            "ineligible" | "rejected" | "denied" => Self::Ineligible,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown(key.trim().to_string()),
        }
    }

    pub fn label(&self) -> String {
        let label = match self {
            Self::Active => "Active",
            Self::Paid => "Paid",
            Self::Eligible => "Eligible",
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Overdue => "Overdue",
            Self::Blocked => "Blocked",
            Self::Ineligible => "Ineligible",
            Self::Cancelled => "Cancelled",
            Self::Unknown(raw) => return raw.to_uppercase(),
        };
        label.to_string()
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Active | Self::Paid | Self::Eligible => palette::SUCCESS,
            Self::Pending | Self::Processing => palette::WARNING,
            Self::Overdue | Self::Blocked | Self::Ineligible => palette::DANGER,
            Self::Cancelled | Self::Unknown(_) => palette::NEUTRAL,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Active | Self::Paid | Self::Eligible => "+",
            Self::Pending | Self::Processing => "\u{00BB}",
            Self::Overdue | Self::Blocked => "!",
            Self::Ineligible | Self::Cancelled => "\u{00D7}",
            Self::Unknown(_) => "?",
        }
    }

    pub fn style(&self) -> StatusStyle {
        StatusStyle {
            label: self.label(),
            color: self.color(),
            icon: self.icon().to_string(),
            known: !matches!(self, Self::Unknown(_)),
        }
    }
}

/// Status lookup: configured overrides first, then the built-in vocabulary.
pub struct StatusTable<'a> {
    overrides: &'a BTreeMap<String, StatusOverride>,
}

impl<'a> StatusTable<'a> {
    pub fn new(overrides: &'a BTreeMap<String, StatusOverride>) -> Self {
        Self { overrides }
    }

    pub fn style(&self, key: &str) -> StatusStyle {
        let normalized = normalize_key(key);
        if let Some(o) = self
            .overrides
            .iter()
            .find(|(k, _)| normalize_key(k) == normalized)
            .map(|(_, o)| o)
        {
            return StatusStyle {
                label: o.label.clone(),
                color: o.color,
                icon: o.icon.clone().unwrap_or_else(|| "\u{2022}".to_string()),
                known: true,
            };
        }
        let style = StatusKind::from_key(key).style();
        if !style.known {
            log::warn!("unmapped status key {key:?}, using neutral fallback");
        }
        style
    }
}

impl Urgency {
    pub fn color(self) -> Color {
        match self {
            Urgency::Critical => palette::DANGER,
            Urgency::Warning => palette::WARNING,
            Urgency::Info => palette::INFO,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Urgency::Critical => "!",
            Urgency::Warning => "\u{2022}",
            Urgency::Info => "\u{00B7}",
        }
    }
}

/// Fill color for a progress bar: at or above `high` is good, at or above
/// `medium` is a warning, anything lower is a danger.
pub fn progress_color(percent: f64, thresholds: &Thresholds) -> Color {
    if percent >= thresholds.high {
        palette::SUCCESS
    } else if percent >= thresholds.medium {
        palette::WARNING
    } else {
        palette::DANGER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_map_to_labels() {
        assert_eq!(StatusKind::from_key("PAID"), StatusKind::Paid);
        assert_eq!(StatusKind::from_key(" in-progress "), StatusKind::Processing);
        assert_eq!(StatusKind::from_key("Canceled").label(), "Cancelled");
        assert_eq!(StatusKind::from_key("overdue").color(), palette::DANGER);
    }

    #[test]
    fn unknown_key_falls_back_to_uppercased_raw_key() {
        let table_src = BTreeMap::new();
        let table = StatusTable::new(&table_src);
        let style = table.style("awaiting_docs");
        assert_eq!(style.label, "AWAITING_DOCS");
        assert_eq!(style.color, palette::NEUTRAL);
        assert!(!style.known);
    }

    #[test]
    fn overrides_win_over_builtins() {
        let mut src = BTreeMap::new();
        src.insert(
            "Paid".to_string(),
            StatusOverride {
                label: "Quitado".into(),
                color: palette::INFO,
                icon: None,
            },
        );
        let table = StatusTable::new(&src);
        let style = table.style("paid");
        assert_eq!(style.label, "Quitado");
        assert_eq!(style.color, palette::INFO);
        assert!(style.known);
    }

    #[test]
    fn progress_bands() {
        let t = Thresholds::default();
        assert_eq!(progress_color(90.0, &t), palette::SUCCESS);
        assert_eq!(progress_color(t.medium, &t), palette::WARNING);
        assert_eq!(progress_color(10.0, &t), palette::DANGER);
    }
}
