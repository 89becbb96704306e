//! Diagram layout and labelling choices.

use crate::config::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Flow direction of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Direction {
    /// Head branches on the left, base branches on the right.
    #[default]
    LeftToRight,
    /// Head branches on the right, base branches on the left.
    RightToLeft,
}

impl Direction {
    /// Keyword used in the `graph` header.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lr" => Ok(Self::LeftToRight),
            "rl" => Ok(Self::RightToLeft),
            _ => Err(ConfigError::InvalidChoice {
                field: "direction",
                value: s.to_string(),
                expected: "lr, rl",
            }),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword().to_ascii_lowercase())
    }
}

/// What each edge is annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LabelStyle {
    /// `head --> |#12 Title| base`
    #[default]
    Number,
    /// `head("Title") --> |Draft| base`
    Status,
}

impl FromStr for LabelStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(Self::Number),
            "status" => Ok(Self::Status),
            _ => Err(ConfigError::InvalidChoice {
                field: "labels",
                value: s.to_string(),
                expected: "number, status",
            }),
        }
    }
}

impl TryFrom<String> for LabelStyle {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Number => "number",
            Self::Status => "status",
        })
    }
}

/// Options for [`build_diagram`](super::build_diagram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagramOptions {
    /// Flow direction.
    pub direction: Direction,
    /// Edge annotation style.
    pub labels: LabelStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_choices_case_insensitively() {
        assert_eq!("LR".parse::<Direction>().unwrap(), Direction::LeftToRight);
        assert_eq!("rl".parse::<Direction>().unwrap(), Direction::RightToLeft);
        assert_eq!("Status".parse::<LabelStyle>().unwrap(), LabelStyle::Status);
    }

    #[test]
    fn parse_rejects_unknown_choices() {
        assert!(matches!(
            "up".parse::<Direction>(),
            Err(ConfigError::InvalidChoice { field: "direction", .. })
        ));
        assert!(matches!(
            "emoji".parse::<LabelStyle>(),
            Err(ConfigError::InvalidChoice { field: "labels", .. })
        ));
    }
}
