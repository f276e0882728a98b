use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Screen corner or edge a toast container is pinned to.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    TopRight,
    TopLeft,
    TopCenter,
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl Position {
    pub const ALL: [Self; 6] = [
        Self::TopRight,
        Self::TopLeft,
        Self::TopCenter,
        Self::BottomRight,
        Self::BottomLeft,
        Self::BottomCenter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
        }
    }

    /// Fixed layout classes of the container for this position.
    pub const fn layout_classes(self) -> &'static [&'static str] {
        match self {
            Self::TopRight => &["position-fixed", "top-0", "end-0", "p-3"],
            Self::TopLeft => &["position-fixed", "top-0", "start-0", "p-3"],
            Self::TopCenter => &[
                "position-fixed",
                "top-0",
                "start-50",
                "translate-middle-x",
                "p-3",
            ],
            Self::BottomRight => &["position-fixed", "bottom-0", "end-0", "p-3"],
            Self::BottomLeft => &["position-fixed", "bottom-0", "start-0", "p-3"],
            Self::BottomCenter => &[
                "position-fixed",
                "bottom-0",
                "start-50",
                "translate-middle-x",
                "p-3",
            ],
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|position| position.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown position: {s}"))
    }
}

/// Named color category driving a toast's palette.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Danger,
    #[default]
    Dark,
    Light,
}

impl Variant {
    pub const ALL: [Self; 8] = [
        Self::Primary,
        Self::Secondary,
        Self::Success,
        Self::Info,
        Self::Warning,
        Self::Danger,
        Self::Dark,
        Self::Light,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown variant: {s}"))
    }
}

/// What a repeated show does when a live toast already carries the same key.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Reshow,
    Ignore,
}

impl DuplicatePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reshow => "reshow",
            Self::Ignore => "ignore",
        }
    }
}

impl Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reshow" => Ok(Self::Reshow),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown duplicate policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DuplicatePolicy, Position, Variant};
    use std::str::FromStr;

    #[test]
    fn position_from_str_accepts_known_names() {
        assert_eq!(Position::from_str("bottom-left"), Ok(Position::BottomLeft));
        assert_eq!(Position::from_str("TOP-CENTER"), Ok(Position::TopCenter));
        assert!(Position::from_str("middle").is_err());
    }

    #[test]
    fn centered_positions_translate_horizontally() {
        for position in Position::ALL {
            let centered = position.as_str().ends_with("center");
            assert_eq!(
                position.layout_classes().contains(&"translate-middle-x"),
                centered,
                "{position}"
            );
        }
    }

    #[test]
    fn variant_round_trips_through_display() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_str(&variant.to_string()), Ok(variant));
        }
        assert!(Variant::from_str("purple").is_err());
    }

    #[test]
    fn duplicate_policy_defaults_to_reshow() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Reshow);
        assert_eq!(DuplicatePolicy::from_str("Ignore"), Ok(DuplicatePolicy::Ignore));
    }
}
