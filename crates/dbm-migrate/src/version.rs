//! Registered versions.

use chrono::{DateTime, Utc};

use crate::changeset::Changeset;
use crate::history::HistoryRecord;

/// A numbered group of up and down changesets.
#[derive(Debug, Clone)]
pub struct Version {
    id: Option<i64>,
    version: i64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    up: Vec<Changeset>,
    down: Vec<Changeset>,
    applied: bool,
}

impl Version {
    /// Creates a pending version.
    #[must_use]
    pub const fn new(version: i64, up: Vec<Changeset>, down: Vec<Changeset>) -> Self {
        Self {
            id: None,
            version,
            created_at: None,
            updated_at: None,
            up,
            down,
            applied: false,
        }
    }

    /// The version number.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// History row id, once applied.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// When the version was recorded, once applied.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// When the history row was last touched, once applied.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Changesets applied by `migrate`.
    #[must_use]
    pub fn up(&self) -> &[Changeset] {
        &self.up
    }

    /// Changesets applied by `rollback`.
    #[must_use]
    pub fn down(&self) -> &[Changeset] {
        &self.down
    }

    /// Whether the history table records this version, as of the last sync.
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.applied
    }

    pub(crate) fn mark_applied(&mut self, record: &HistoryRecord) {
        self.id = Some(record.id);
        self.created_at = Some(record.created_at);
        self.updated_at = Some(record.updated_at);
        self.applied = true;
    }

    pub(crate) fn mark_recorded(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
        self.updated_at = Some(at);
        self.applied = true;
    }

    pub(crate) fn mark_pending(&mut self) {
        self.id = None;
        self.created_at = None;
        self.updated_at = None;
        self.applied = false;
    }
}
