// Priority designator parsing and the priority level model

use std::fmt;

/// A scheduling priority class, carried as an ordinal.
///
/// The ordinal is deliberately unvalidated at construction: a numeric
/// designator in the rule file becomes whatever ordinal it names, and an
/// out-of-range value only surfaces as an error when it is assigned to a
/// process (see `nice`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityLevel(i32);

impl PriorityLevel {
    pub const IDLE: Self = Self(0);
    pub const BELOW_NORMAL: Self = Self(1);
    pub const NORMAL: Self = Self(2);
    pub const ABOVE_NORMAL: Self = Self(3);
    pub const HIGH: Self = Self(4);
    pub const REAL_TIME: Self = Self(5);

    pub const fn from_ordinal(ordinal: i32) -> Self {
        Self(ordinal)
    }

    pub const fn ordinal(self) -> i32 {
        self.0
    }

    /// Canonical name of the level, or None for an out-of-range ordinal
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::IDLE => Some("Idle"),
            Self::BELOW_NORMAL => Some("BelowNormal"),
            Self::NORMAL => Some("Normal"),
            Self::ABOVE_NORMAL => Some("AboveNormal"),
            Self::HIGH => Some("High"),
            Self::REAL_TIME => Some("RealTime"),
            _ => None,
        }
    }

    /// Unix niceness for the level, or None for an out-of-range ordinal
    pub fn nice(self) -> Option<i32> {
        match self {
            Self::IDLE => Some(19),
            Self::BELOW_NORMAL => Some(10),
            Self::NORMAL => Some(0),
            Self::ABOVE_NORMAL => Some(-5),
            Self::HIGH => Some(-10),
            Self::REAL_TIME => Some(-20),
            _ => None,
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "ordinal {}", self.0),
        }
    }
}

/// Parse a textual priority designator into a level.
///
/// Tries, in order: the short symbolic table (low, lowest, normal, high,
/// highest), an integer ordinal (unvalidated), and the canonical level name
/// (case-insensitive). Anything else falls back to Idle with a warning;
/// resolution never fails.
pub fn resolve(text: &str) -> PriorityLevel {
    match text.to_lowercase().as_str() {
        "low" => PriorityLevel::BELOW_NORMAL,
        "lowest" => PriorityLevel::IDLE,
        "high" => PriorityLevel::ABOVE_NORMAL,
        "highest" => PriorityLevel::REAL_TIME,
        "normal" => PriorityLevel::NORMAL,
        other => {
            if let Ok(ordinal) = other.parse::<i32>() {
                return PriorityLevel::from_ordinal(ordinal);
            }
            if let Some(level) = from_level_name(other) {
                return level;
            }
            log::warn!(
                "Unrecognized priority designator '{}', falling back to Idle",
                text
            );
            PriorityLevel::IDLE
        }
    }
}

/// Match an already-lowercased string against the canonical level names
fn from_level_name(text: &str) -> Option<PriorityLevel> {
    match text {
        "idle" => Some(PriorityLevel::IDLE),
        "belownormal" => Some(PriorityLevel::BELOW_NORMAL),
        "normal" => Some(PriorityLevel::NORMAL),
        "abovenormal" => Some(PriorityLevel::ABOVE_NORMAL),
        "high" => Some(PriorityLevel::HIGH),
        "realtime" => Some(PriorityLevel::REAL_TIME),
        _ => None,
    }
}
