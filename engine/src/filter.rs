//! Eligibility filtering of the draw pool.

use crate::record::{NameRecord, Remark, Sex};
use serde::{Deserialize, Serialize};

/// Sex / remark selectors applied to the not-drawn set.
///
/// `None` on either selector means "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawFilter {
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub remark: Option<Remark>,
}

impl DrawFilter {
    /// A filter with no constraints.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_remark(mut self, remark: Remark) -> Self {
        self.remark = Some(remark);
        self
    }

    /// Eligible candidates: not-drawn records passing the sex selector, then
    /// the remark selector applied to that result. Pool order is preserved.
    pub fn apply(&self, records: &[NameRecord]) -> Vec<NameRecord> {
        let mut candidates: Vec<NameRecord> = records
            .iter()
            .filter(|r| r.is_not_drawn())
            .cloned()
            .collect();

        if let Some(sex) = self.sex {
            candidates.retain(|r| r.sex == sex);
        }
        if let Some(remark) = self.remark {
            candidates.retain(|r| r.remark == remark);
        }
        candidates
    }

    /// Check if any constraint is active.
    pub fn is_constrained(&self) -> bool {
        self.sex.is_some() || self.remark.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Status;
    use serde_json::json;

    fn pool() -> Vec<NameRecord> {
        vec![
            NameRecord::new("Alice", Sex::Female, Remark::English),
            NameRecord::new("Bob", Sex::Male, Remark::English),
            NameRecord::new("Kenji", Sex::Male, Remark::Japanese),
            NameRecord::new("Yui", Sex::Female, Remark::Japanese).with_status(Status::Drawn),
            NameRecord::new("Lee", Sex::Male, Remark::None).with_status(Status::Deleted),
        ]
    }

    fn names(records: &[NameRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn no_constraint_keeps_not_drawn() {
        let eligible = DrawFilter::any().apply(&pool());
        assert_eq!(names(&eligible), vec!["Alice", "Bob", "Kenji"]);
        assert!(!DrawFilter::any().is_constrained());
    }

    #[test]
    fn sex_filter_excludes_drawn() {
        let eligible = DrawFilter::any().with_sex(Sex::Female).apply(&pool());
        assert_eq!(names(&eligible), vec!["Alice"]);
    }

    #[test]
    fn filters_compose() {
        let filter = DrawFilter::any()
            .with_sex(Sex::Male)
            .with_remark(Remark::Japanese);
        assert_eq!(names(&filter.apply(&pool())), vec!["Kenji"]);

        let filter = DrawFilter::any()
            .with_sex(Sex::Female)
            .with_remark(Remark::Japanese);
        assert!(filter.apply(&pool()).is_empty());
    }

    #[test]
    fn remark_only() {
        let filter = DrawFilter::any().with_remark(Remark::English);
        assert_eq!(names(&filter.apply(&pool())), vec!["Alice", "Bob"]);
    }

    #[test]
    fn deserialize() {
        let filter: DrawFilter = serde_json::from_value(json!({"sex": "male"})).unwrap();
        assert_eq!(filter, DrawFilter::any().with_sex(Sex::Male));

        let filter: DrawFilter = serde_json::from_value(json!({"remark": "en"})).unwrap();
        assert_eq!(filter.remark, Some(Remark::English));
    }
}
