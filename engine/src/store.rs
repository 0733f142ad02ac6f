//! Store - the in-memory name pool.
//!
//! The draw engine only needs two things from a pool: a view of every record
//! and a way to commit a record as drawn. That seam is the [`RecordStore`]
//! trait. [`NameStore`] is the in-memory implementation, which also carries
//! the list-management operations (delete, restore, reset) the engine itself
//! never performs.

use crate::{
    error::Result,
    events::Dispatcher,
    record::{NameRecord, Remark, Sex, Status},
    Error,
};
use serde::{Deserialize, Serialize};

/// Read/commit access to a pool of name records.
pub trait RecordStore {
    /// Every record in the pool, regardless of status.
    fn records(&self) -> &[NameRecord];

    /// Commit a record as drawn.
    fn mark_drawn(&mut self, name: &str) -> Result<()>;
}

/// Notifications emitted when the pool changes wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreEvent {
    /// A new pool was loaded
    Load,
    /// The pool was emptied
    Clear,
    /// Every drawn record went back to not drawn
    Reset,
}

/// Per-status record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub not_drawn: usize,
    pub drawn: usize,
    pub deleted: usize,
}

impl StatusCounts {
    /// Total number of records.
    pub fn total(&self) -> usize {
        self.not_drawn + self.drawn + self.deleted
    }
}

/// In-memory record pool, ordered by insertion.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameStore {
    records: Vec<NameRecord>,
    #[serde(skip)]
    events: Dispatcher<StoreEvent, StoreEvent>,
}

impl NameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from records, rejecting duplicate names.
    pub fn from_records(records: Vec<NameRecord>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Register a listener for a store event.
    pub fn subscribe(&mut self, kind: StoreEvent, listener: impl FnMut(&StoreEvent) + 'static) {
        self.events.subscribe(kind, listener);
    }

    /// Replace the whole pool and notify `Load` listeners.
    pub fn load(&mut self, records: Vec<NameRecord>) -> Result<()> {
        let loaded = Self::from_records(records)?;
        self.records = loaded.records;
        tracing::debug!(count = self.records.len(), "name pool loaded");
        self.events.emit(StoreEvent::Load, &StoreEvent::Load);
        Ok(())
    }

    /// Insert a record.
    pub fn insert(&mut self, record: NameRecord) -> Result<()> {
        if self.contains(&record.name) {
            return Err(Error::DuplicateName(record.name));
        }
        self.records.push(record);
        Ok(())
    }

    /// Check if a name exists (any status).
    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    /// Get a record by name.
    pub fn get(&self, name: &str) -> Option<&NameRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut NameRecord> {
        self.records
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RecordNotFound(name.to_string()))
    }

    /// Soft-delete a record.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.get_mut(name)?.status = Status::Deleted;
        Ok(())
    }

    /// Bring a deleted record back as not drawn. Records that are not deleted
    /// are left untouched.
    pub fn restore(&mut self, name: &str) -> Result<()> {
        let record = self.get_mut(name)?;
        if record.status == Status::Deleted {
            record.status = Status::NotDrawn;
        }
        Ok(())
    }

    /// Mark every drawn record as not drawn and notify `Reset` listeners.
    ///
    /// Returns the number of records reset.
    pub fn reset(&mut self) -> usize {
        let mut reset = 0;
        for record in self.records.iter_mut().filter(|r| r.status == Status::Drawn) {
            record.status = Status::NotDrawn;
            reset += 1;
        }
        self.events.emit(StoreEvent::Reset, &StoreEvent::Reset);
        reset
    }

    /// Remove every record and notify `Clear` listeners.
    pub fn clear(&mut self) {
        self.records.clear();
        self.events.emit(StoreEvent::Clear, &StoreEvent::Clear);
    }

    /// Query records.
    pub fn query(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.records)
    }

    /// Count records per status.
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            not_drawn: self.query().status(Status::NotDrawn).count(),
            drawn: self.query().status(Status::Drawn).count(),
            deleted: self.query().status(Status::Deleted).count(),
        }
    }

    /// Number of records (any status).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the pool has no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the store, returning its records.
    pub fn into_records(self) -> Vec<NameRecord> {
        self.records
    }
}

impl RecordStore for NameStore {
    fn records(&self) -> &[NameRecord] {
        &self.records
    }

    fn mark_drawn(&mut self, name: &str) -> Result<()> {
        self.get_mut(name)?.status = Status::Drawn;
        Ok(())
    }
}

/// Builder for querying records by exact attribute values.
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    records: &'a [NameRecord],
    status: Option<Status>,
    sex: Option<Sex>,
    remark: Option<Remark>,
}

impl<'a> QueryBuilder<'a> {
    fn new(records: &'a [NameRecord]) -> Self {
        Self {
            records,
            status: None,
            sex: None,
            remark: None,
        }
    }

    /// Only records with this status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Only records with this sex.
    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Only records with this remark.
    pub fn remark(mut self, remark: Remark) -> Self {
        self.remark = Some(remark);
        self
    }

    fn matches(&self, record: &NameRecord) -> bool {
        self.status.is_none_or(|s| record.status == s)
            && self.sex.is_none_or(|s| record.sex == s)
            && self.remark.is_none_or(|r| record.remark == r)
    }

    /// Get all matching records.
    pub fn all(self) -> Vec<&'a NameRecord> {
        self.records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Names of all matching records.
    pub fn names(self) -> Vec<&'a str> {
        self.records
            .iter()
            .filter(|r| self.matches(r))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Count matching records.
    pub fn count(self) -> usize {
        self.records.iter().filter(|r| self.matches(r)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_store() -> NameStore {
        NameStore::from_records(vec![
            NameRecord::new("Alice", Sex::Female, Remark::English),
            NameRecord::new("Bob", Sex::Male, Remark::None).with_status(Status::Drawn),
            NameRecord::new("Kenji", Sex::Male, Remark::Japanese),
        ])
        .unwrap()
    }

    #[test]
    fn create_store() {
        let store = test_store();
        assert_eq!(store.len(), 3);
        assert!(store.contains("Kenji"));
        assert!(!store.is_empty());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut store = test_store();
        let err = store
            .insert(NameRecord::new("Alice", Sex::Female, Remark::None))
            .unwrap_err();
        assert_eq!(err, Error::DuplicateName("Alice".into()));
    }

    #[test]
    fn mark_drawn() {
        let mut store = test_store();
        store.mark_drawn("Alice").unwrap();
        assert_eq!(store.get("Alice").unwrap().status, Status::Drawn);

        let err = store.mark_drawn("Nobody").unwrap_err();
        assert_eq!(err, Error::RecordNotFound("Nobody".into()));
    }

    #[test]
    fn delete_and_restore() {
        let mut store = test_store();
        store.delete("Bob").unwrap();
        assert_eq!(store.get("Bob").unwrap().status, Status::Deleted);

        store.restore("Bob").unwrap();
        assert_eq!(store.get("Bob").unwrap().status, Status::NotDrawn);

        // Restoring a live record changes nothing
        store.mark_drawn("Kenji").unwrap();
        store.restore("Kenji").unwrap();
        assert_eq!(store.get("Kenji").unwrap().status, Status::Drawn);
    }

    #[test]
    fn reset_only_touches_drawn() {
        let mut store = test_store();
        store.delete("Kenji").unwrap();
        assert_eq!(store.reset(), 1);
        assert_eq!(store.get("Bob").unwrap().status, Status::NotDrawn);
        assert_eq!(store.get("Kenji").unwrap().status, Status::Deleted);
    }

    #[test]
    fn query_filter() {
        let store = test_store();
        assert_eq!(store.query().sex(Sex::Male).names(), vec!["Bob", "Kenji"]);
        assert_eq!(
            store.query().sex(Sex::Male).status(Status::NotDrawn).names(),
            vec!["Kenji"]
        );
        assert_eq!(store.query().remark(Remark::English).count(), 1);
        assert_eq!(store.query().all().len(), 3);
    }

    #[test]
    fn counts() {
        let mut store = test_store();
        store.delete("Kenji").unwrap();
        let counts = store.counts();
        assert_eq!(
            counts,
            StatusCounts {
                not_drawn: 1,
                drawn: 1,
                deleted: 1
            }
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn events_fire() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = NameStore::new();
        for kind in [StoreEvent::Load, StoreEvent::Clear, StoreEvent::Reset] {
            let sink = Rc::clone(&seen);
            store.subscribe(kind, move |e| sink.borrow_mut().push(*e));
        }

        store
            .load(vec![NameRecord::new("Alice", Sex::Female, Remark::None)])
            .unwrap();
        store.reset();
        store.clear();

        assert_eq!(
            *seen.borrow(),
            vec![StoreEvent::Load, StoreEvent::Reset, StoreEvent::Clear]
        );
        assert!(store.is_empty());
    }

    #[test]
    fn failed_load_keeps_old_pool() {
        let mut store = test_store();
        let dup = vec![
            NameRecord::new("X", Sex::Male, Remark::None),
            NameRecord::new("X", Sex::Male, Remark::None),
        ];
        assert!(store.load(dup).is_err());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn store_serialization() {
        let store = test_store();
        let json = serde_json::to_string(&store).unwrap();
        let parsed: NameStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records(), store.records());
    }
}
