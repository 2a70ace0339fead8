use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TodoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Canonical upper-case name, also the stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }

    /// Forgiving parser for user input: anything unrecognized, including the
    /// empty string, is read as `Medium`.
    pub fn parse_lenient(input: &str) -> Priority {
        Self::from_keyword(input).unwrap_or_default()
    }

    fn from_keyword(input: &str) -> Option<Priority> {
        match input.trim().to_uppercase().as_str() {
            "HIGH" | "H" => Some(Priority::High),
            "MEDIUM" | "MED" | "M" => Some(Priority::Medium),
            "LOW" | "L" => Some(Priority::Low),
            _ => None,
        }
    }

    fn from_level(level: u64) -> Option<Priority> {
        match level {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| TodoError::InvalidPriority {
            input: s.to_string(),
        })
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Accepts the symbolic name or the small integer level (0 = low .. 2 = high).
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriorityVisitor;

        impl<'de> Visitor<'de> for PriorityVisitor {
            type Value = Priority;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a priority name (HIGH, MEDIUM, LOW) or level 0-2")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Priority, E> {
                Priority::from_keyword(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Priority, E> {
                Priority::from_level(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Priority, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(Priority::from_level)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }
        }

        deserializer.deserialize_any(PriorityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Priority::High.to_string(), "HIGH");
        assert_eq!(Priority::Medium.to_string(), "MEDIUM");
        assert_eq!(Priority::Low.to_string(), "LOW");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Priority::parse_lenient("high"), Priority::High);
        assert_eq!(Priority::parse_lenient("H"), Priority::High);
        assert_eq!(Priority::parse_lenient("Med"), Priority::Medium);
        assert_eq!(Priority::parse_lenient("m"), Priority::Medium);
        assert_eq!(Priority::parse_lenient("LOW"), Priority::Low);
        assert_eq!(Priority::parse_lenient("l"), Priority::Low);

        // Fallbacks
        assert_eq!(Priority::parse_lenient(""), Priority::Medium);
        assert_eq!(Priority::parse_lenient("urgent"), Priority::Medium);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("l".parse::<Priority>().unwrap(), Priority::Low);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TodoError::InvalidPriority { .. })
        ));
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn test_decode_name_or_level() {
        let by_name: Priority = serde_json::from_str("\"HIGH\"").unwrap();
        let by_level: Priority = serde_json::from_str("2").unwrap();
        let lower: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(by_name, Priority::High);
        assert_eq!(by_level, Priority::High);
        assert_eq!(lower, Priority::Low);

        assert!(serde_json::from_str::<Priority>("7").is_err());
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"MEDIUM\"");
    }
}
