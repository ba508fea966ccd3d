//! The client repository.
//!
//! [`ClientRepository`] owns the persisted list of client records. Every
//! operation is a read-modify-write of the whole list: load it from the
//! backing store, change it in memory, and write it back as one value. After
//! each successful write the repository publishes an immutable [`Snapshot`]
//! that presentation code can subscribe to.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::client::{Client, ClientDraft, ClientId, IdGenerator};
use crate::error::{Error, Result};
use crate::search;
use crate::storage::RecordStore;
use crate::validate::validate;

/// Default key the record list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "fitness_clients";

/// A point-in-time, immutable copy of every stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    revision: u64,
    records: Arc<[Client]>,
}

impl Snapshot {
    fn new(revision: u64, records: Vec<Client>) -> Self {
        Self {
            revision,
            records: records.into(),
        }
    }

    /// Increases by one with every successful write.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Client] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn find(&self, id: &ClientId) -> Option<&Client> {
        self.records.iter().find(|client| client.id() == id)
    }

    /// Records whose name contains `query`, ignoring case.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&Client> {
        search::filter(&self.records, query)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Persistent collection of client records.
///
/// Built once per session around an explicit backing store.
#[derive(Debug)]
pub struct ClientRepository<S> {
    store: S,
    key: String,
    ids: IdGenerator,
    snapshots: watch::Sender<Snapshot>,
}

impl<S: RecordStore> ClientRepository<S> {
    /// Open a repository over `store`, keeping records under `key`.
    ///
    /// Loads the current records to seed the initial snapshot and the id
    /// generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored records cannot be read or decoded.
    pub fn open(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let records = read_records(&store, &key)?;

        let mut ids = IdGenerator::new();
        for client in &records {
            ids.observe(client.id());
        }

        debug!(key = %key, count = records.len(), "Opened client repository");
        let (snapshots, _) = watch::channel(Snapshot::new(0, records));

        Ok(Self {
            store,
            key,
            ids,
            snapshots,
        })
    }

    /// The key records are stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read every persisted record, in insertion order.
    ///
    /// A key that was never written yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or its contents cannot be decoded.
    pub fn load(&self) -> Result<Vec<Client>> {
        read_records(&self.store, &self.key)
    }

    /// Replace the persisted records with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if any record fails validation,
    /// [`Error::DuplicateId`] if two records share an id, or a storage error.
    /// Nothing is written in any of these cases.
    pub fn save(&mut self, records: &[Client]) -> Result<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for client in records {
            validate(&client.to_draft())?;
            if !seen.insert(client.id()) {
                return Err(Error::DuplicateId {
                    id: client.id().clone(),
                });
            }
        }

        for client in records {
            self.ids.observe(client.id());
        }
        self.persist(records.to_vec())
    }

    /// Validate `draft`, assign it a fresh id and append it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is invalid,
    /// [`Error::IdSpaceExhausted`] if no unused id is left, or a storage error.
    pub fn create(&mut self, draft: ClientDraft) -> Result<Client> {
        validate(&draft)?;

        let mut records = self.load()?;
        for client in &records {
            self.ids.observe(client.id());
        }

        let id = self.ids.next_id().ok_or(Error::IdSpaceExhausted)?;
        let client = Client::from_draft(id, draft);
        records.push(client.clone());
        self.persist(records)?;

        info!(id = %client.id(), "Created client");
        Ok(client)
    }

    /// Replace the record with `id` by `draft`, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is invalid,
    /// [`Error::NotFound`] if no record has `id`, or a storage error.
    pub fn update(&mut self, id: &ClientId, draft: ClientDraft) -> Result<Client> {
        validate(&draft)?;

        let mut records = self.load()?;
        let slot = records
            .iter_mut()
            .find(|client| client.id() == id)
            .ok_or_else(|| Error::not_found(id))?;
        *slot = Client::from_draft(id.clone(), draft);
        let updated = slot.clone();

        self.persist(records)?;

        info!(id = %id, "Updated client");
        Ok(updated)
    }

    /// Remove the record with `id`.
    ///
    /// Returns `true` if a record was removed, `false` if none had that id.
    /// Deleting a missing id writes nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn delete(&mut self, id: &ClientId) -> Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|client| client.id() != id);

        if records.len() == before {
            debug!(id = %id, "Delete of unknown client ignored");
            return Ok(false);
        }

        self.persist(records)?;
        info!(id = %id, "Deleted client");
        Ok(true)
    }

    /// Find the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or decoded.
    pub fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>> {
        Ok(self.load()?.into_iter().find(|client| client.id() == id))
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshots published after each successful write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Re-read the store and publish a new snapshot if its contents changed.
    ///
    /// Picks up writes made by another process sharing the same store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or decoded.
    pub fn reload(&mut self) -> Result<Snapshot> {
        let records = self.load()?;
        if records.as_slice() != self.snapshots.borrow().records() {
            for client in &records {
                self.ids.observe(client.id());
            }
            self.publish(records);
        }
        Ok(self.snapshot())
    }

    fn persist(&mut self, records: Vec<Client>) -> Result<()> {
        let encoded = serde_json::to_string(&records)?;
        self.store.write(&self.key, &encoded)?;
        debug!(key = %self.key, count = records.len(), "Saved clients");
        self.publish(records);
        Ok(())
    }

    fn publish(&self, records: Vec<Client>) {
        let revision = self.snapshots.borrow().revision() + 1;
        self.snapshots.send_replace(Snapshot::new(revision, records));
    }
}

fn read_records<S: RecordStore>(store: &S, key: &str) -> Result<Vec<Client>> {
    match store.read(key)? {
        Some(encoded) => Ok(serde_json::from_str(&encoded)?),
        None => Ok(Vec::new()),
    }
}
