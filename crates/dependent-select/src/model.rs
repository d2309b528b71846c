//! Data Model
//!
//! Staff records as decoded from the data source, the option entries written
//! into the dependent control, and the observable sync state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Staff identifier, normalized to the string form a select option carries.
///
/// The data source may send ids as JSON numbers or strings while DOM values
/// are always strings. `numeric` records which form the id arrived in, so
/// comparison can follow [`StaffId::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaffId {
    text: String,
    numeric: bool,
}

impl StaffId {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    /// Loose equivalence: equal text, or numerically equal when either side
    /// arrived as a number. Two string ids never compare numerically.
    pub fn matches(&self, other: &StaffId) -> bool {
        if self.text == other.text {
            return true;
        }
        if !(self.numeric || other.numeric) {
            return false;
        }
        match (finite_number(&self.text), finite_number(&other.text)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    fn number(text: String) -> Self {
        Self { text, numeric: true }
    }

    fn from_float(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Self::number((value as i64).to_string())
        } else {
            Self::number(value.to_string())
        }
    }
}

/// Numeric value of an id string; empty and non-finite spellings have none
fn finite_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for StaffId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for StaffId {
    fn from(value: String) -> Self {
        Self {
            text: value,
            numeric: false,
        }
    }
}

impl From<u32> for StaffId {
    fn from(value: u32) -> Self {
        Self::number(value.to_string())
    }
}

impl From<i64> for StaffId {
    fn from(value: i64) -> Self {
        Self::number(value.to_string())
    }
}

impl Serialize for StaffId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(n) = self.text.parse::<i64>() {
                return serializer.serialize_i64(n);
            }
            if let Some(n) = finite_number(&self.text) {
                return serializer.serialize_f64(n);
            }
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for StaffId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => StaffId::from(n),
            RawId::Float(f) => StaffId::from_float(f),
            RawId::Text(s) => StaffId::from(s),
        })
    }
}

/// One staff member associated with a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub id: StaffId,
    pub name: String,
}

impl StaffRecord {
    pub fn new(id: impl Into<StaffId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A `{value, label}` entry of a select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Placeholder entry; its value is always empty
    pub fn sentinel(label: impl Into<String>) -> Self {
        Self::new("", label)
    }

    pub fn is_sentinel(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&StaffRecord> for SelectOption {
    fn from(record: &StaffRecord) -> Self {
        Self::new(record.id.as_str(), record.name.clone())
    }
}

/// Where the dependent control currently stands.
///
/// `Populated` with `staff_count == 0` means the source answered with no
/// staff and the "no staff" sentinel is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No parent selection
    #[default]
    Empty,
    /// A request for `course_id` is in flight
    Loading { course_id: String },
    Populated {
        course_id: String,
        staff_count: usize,
        selected: Option<String>,
    },
    Failed { course_id: String, reason: String },
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncState::Loading { .. })
    }
}

/// Result of a single `sync` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The call settled and wrote the dependent control
    Applied(SyncState),
    /// A newer sync was issued while this one waited; its result was dropped
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_id_from_json_number_and_string() {
        let ids: Vec<StaffId> = serde_json::from_str(r#"[12, "12", 7.0, 2.5, "abc"]"#).unwrap();
        let ids: Vec<&str> = ids.iter().map(StaffId::as_str).collect();
        assert_eq!(ids, vec!["12", "12", "7", "2.5", "abc"]);
    }

    #[test]
    fn test_numeric_id_matches_numeric_spellings() {
        let id = StaffId::from(7u32);
        assert!(id.matches(&StaffId::from("7")));
        assert!(id.matches(&StaffId::from(" 7 ")));
        assert!(id.matches(&StaffId::from("07")));
        assert!(id.matches(&StaffId::from("7.0")));
        assert!(!id.matches(&StaffId::from("70")));
        assert!(!id.matches(&StaffId::from("")));
        // symmetric
        assert!(StaffId::from("07").matches(&id));
    }

    #[test]
    fn test_string_ids_compare_strictly() {
        assert!(StaffId::from("alice").matches(&StaffId::from("alice")));
        assert!(!StaffId::from("alice").matches(&StaffId::from("bob")));
        assert!(!StaffId::from("07").matches(&StaffId::from("7")));
        assert!(!StaffId::from("1e1").matches(&StaffId::from("10")));
        assert!(!StaffId::from("inf").matches(&StaffId::from("Infinity")));
    }

    #[test]
    fn test_non_finite_spellings_never_match_numbers() {
        assert!(!StaffId::from(1u32).matches(&StaffId::from("inf")));
        assert!(!StaffId::from(1u32).matches(&StaffId::from("NaN")));
        assert!(!StaffId::from(1u32).matches(&StaffId::from("")));
    }

    #[test]
    fn test_json_form_is_remembered() {
        let ids: Vec<StaffId> = serde_json::from_str(r#"[12, "12"]"#).unwrap();
        assert!(ids[0].is_numeric());
        assert!(!ids[1].is_numeric());
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[12,"12"]"#);
    }

    #[test]
    fn test_option_from_record() {
        let record = StaffRecord::new(12u32, "A. Lee");
        let option = SelectOption::from(&record);
        assert_eq!(option, SelectOption::new("12", "A. Lee"));
        assert!(!option.is_sentinel());
        assert!(SelectOption::sentinel("no selection").is_sentinel());
    }
}
