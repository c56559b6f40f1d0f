//! Return reason categories.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a reason string is not one of the known categories.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown return reason '{0}'")]
pub struct UnknownReason(pub String);

/// Why a customer is sending an item back.
///
/// Parsing is case-insensitive and accepts `-` or spaces in place of `_`,
/// so `"Wrong item"` and `"wrong-item"` both map to [`ReturnReason::WrongItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnReason {
    Defective,
    WrongItem,
    NoLongerNeeded,
    Other,
}

impl ReturnReason {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [
        Self::Defective,
        Self::WrongItem,
        Self::NoLongerNeeded,
        Self::Other,
    ];

    /// Stable identifier used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Defective => "defective",
            Self::WrongItem => "wrong_item",
            Self::NoLongerNeeded => "no_longer_needed",
            Self::Other => "other",
        }
    }

    /// Human-readable label for forms.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Defective => "Defective or damaged",
            Self::WrongItem => "Wrong item received",
            Self::NoLongerNeeded => "No longer needed",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ReturnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnReason {
    type Err = UnknownReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str() == normalized)
            .ok_or_else(|| UnknownReason(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_values() {
        for reason in ReturnReason::ALL {
            assert_eq!(reason.as_str().parse::<ReturnReason>(), Ok(reason));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_separators() {
        assert_eq!("Wrong item".parse::<ReturnReason>(), Ok(ReturnReason::WrongItem));
        assert_eq!("no-longer-needed".parse::<ReturnReason>(), Ok(ReturnReason::NoLongerNeeded));
        assert_eq!("  DEFECTIVE ".parse::<ReturnReason>(), Ok(ReturnReason::Defective));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "changed my mind".parse::<ReturnReason>().unwrap_err();
        assert_eq!(err, UnknownReason("changed my mind".to_string()));
        assert_eq!(err.to_string(), "unknown return reason 'changed my mind'");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ReturnReason::NoLongerNeeded).expect("serialize");
        assert_eq!(json, "\"no_longer_needed\"");
    }
}
