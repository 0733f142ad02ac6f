//! Name record types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sex attribute of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Remark (language tag) attached to a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remark {
    #[serde(alias = "en")]
    English,
    #[serde(alias = "jp")]
    Japanese,
    /// No remark
    #[default]
    #[serde(alias = "no_remark", alias = "no_remarks")]
    None,
}

/// Draw status of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotDrawn,
    Drawn,
    Deleted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NotDrawn => write!(f, "not drawn"),
            Status::Drawn => write!(f, "drawn"),
            Status::Deleted => write!(f, "deleted"),
        }
    }
}

/// A candidate in the draw pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    /// Display name, unique within a pool
    pub name: String,
    pub sex: Sex,
    #[serde(default)]
    pub remark: Remark,
    #[serde(default)]
    pub status: Status,
}

impl NameRecord {
    /// Create a new, not yet drawn record.
    pub fn new(name: impl Into<String>, sex: Sex, remark: Remark) -> Self {
        Self {
            name: name.into(),
            sex,
            remark,
            status: Status::NotDrawn,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Check if the record can still be drawn.
    pub fn is_not_drawn(&self) -> bool {
        self.status == Status::NotDrawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_record_is_not_drawn() {
        let record = NameRecord::new("Alice", Sex::Female, Remark::English);
        assert_eq!(record.status, Status::NotDrawn);
        assert!(record.is_not_drawn());

        let drawn = record.with_status(Status::Drawn);
        assert!(!drawn.is_not_drawn());
    }

    #[test]
    fn serialization_format() {
        let record = NameRecord::new("Bob", Sex::Male, Remark::None).with_status(Status::Drawn);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"name": "Bob", "sex": "male", "remark": "none", "status": "drawn"})
        );
    }

    #[test]
    fn defaults_and_aliases() {
        let record: NameRecord =
            serde_json::from_value(json!({"name": "Kenji", "sex": "male"})).unwrap();
        assert_eq!(record.remark, Remark::None);
        assert_eq!(record.status, Status::NotDrawn);

        let record: NameRecord = serde_json::from_value(
            json!({"name": "Yui", "sex": "female", "remark": "jp", "status": "not_drawn"}),
        )
        .unwrap();
        assert_eq!(record.remark, Remark::Japanese);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::NotDrawn.to_string(), "not drawn");
        assert_eq!(Status::Deleted.to_string(), "deleted");
    }
}
