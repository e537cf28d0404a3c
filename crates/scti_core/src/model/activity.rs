//! Activity domain model.
//!
//! # Responsibility
//! - Define the activity record (a talk/session with limited seating).
//! - Validate creation input before it reaches storage.
//!
//! # Invariants
//! - `spots` is never negative; it is the remaining seat count.
//! - `time` is a 24-hour `HH:MM` string so `(day, time)` sorts
//!   chronologically as text.
//! - Descriptive fields are immutable after creation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

/// Store-assigned activity identifier.
pub type ActivityId = i64;

/// Persisted activity as seen by core callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    /// Remaining seats. Decremented on signup, incremented on unregister.
    pub spots: u32,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub activity_type: String,
    pub room: String,
    pub speaker: String,
    pub topic: String,
    pub description: String,
    /// Start time, `HH:MM`.
    pub time: String,
    /// Event day the activity happens on. Drives conflict detection.
    pub day: i64,
}

impl Display for Activity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "id: {} | spots: {} | day: {} | time: {}",
            self.id, self.spots, self.day, self.time
        )?;
        writeln!(f, "room: {} | type: {}", self.room, self.activity_type)?;
        writeln!(f, "speaker: {} | topic: {}", self.speaker, self.topic)?;
        write!(f, "description: {}", self.description)
    }
}

/// Creation input for an activity. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    /// Initial seat capacity.
    pub spots: u32,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub room: String,
    pub speaker: String,
    pub topic: String,
    #[serde(default)]
    pub description: String,
    pub time: String,
    pub day: i64,
}

impl NewActivity {
    /// Validates creation input.
    ///
    /// # Errors
    /// - `BlankField` when a required descriptive field is empty after trim.
    /// - `InvalidTime` when `time` is not a 24-hour `HH:MM` value.
    /// - `InvalidDay` when `day` is lower than 1.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        for (field, value) in [
            ("type", &self.activity_type),
            ("room", &self.room),
            ("speaker", &self.speaker),
            ("topic", &self.topic),
        ] {
            if value.trim().is_empty() {
                return Err(ActivityValidationError::BlankField(field));
            }
        }

        if !TIME_OF_DAY_RE.is_match(&self.time) {
            return Err(ActivityValidationError::InvalidTime(self.time.clone()));
        }

        if self.day < 1 {
            return Err(ActivityValidationError::InvalidDay(self.day));
        }

        Ok(())
    }

    /// Builds the persisted shape once storage has assigned an id.
    pub fn into_activity(self, id: ActivityId) -> Activity {
        Activity {
            id,
            spots: self.spots,
            activity_type: self.activity_type,
            room: self.room,
            speaker: self.speaker,
            topic: self.topic,
            description: self.description,
            time: self.time,
            day: self.day,
        }
    }
}

/// Rejected activity creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    BlankField(&'static str),
    InvalidTime(String),
    InvalidDay(i64),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "activity {field} must not be blank"),
            Self::InvalidTime(value) => {
                write!(f, "activity time `{value}` is not a 24-hour HH:MM value")
            }
            Self::InvalidDay(value) => write!(f, "activity day must be >= 1, got {value}"),
        }
    }
}

impl Error for ActivityValidationError {}

#[cfg(test)]
mod tests {
    use super::{ActivityValidationError, NewActivity};

    fn sample() -> NewActivity {
        NewActivity {
            spots: 30,
            activity_type: "talk".to_string(),
            room: "Auditorium".to_string(),
            speaker: "Ada".to_string(),
            topic: "Compilers".to_string(),
            description: String::new(),
            time: "09:30".to_string(),
            day: 1,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn time_must_be_24_hour_clock() {
        for bad in ["9:30", "24:00", "12:60", "noon", ""] {
            let mut input = sample();
            input.time = bad.to_string();
            assert_eq!(
                input.validate(),
                Err(ActivityValidationError::InvalidTime(bad.to_string()))
            );
        }
    }

    #[test]
    fn blank_descriptive_field_is_rejected() {
        let mut input = sample();
        input.speaker = "   ".to_string();
        assert_eq!(
            input.validate(),
            Err(ActivityValidationError::BlankField("speaker"))
        );
    }

    #[test]
    fn day_zero_is_rejected() {
        let mut input = sample();
        input.day = 0;
        assert_eq!(input.validate(), Err(ActivityValidationError::InvalidDay(0)));
    }

    #[test]
    fn display_lists_schedule_first() {
        let activity = sample().into_activity(7);
        let rendered = activity.to_string();
        assert!(rendered.starts_with("id: 7 | spots: 30 | day: 1 | time: 09:30"));
        assert!(rendered.contains("speaker: Ada | topic: Compilers"));
    }
}
