//! In-memory repository backing the admin console.
//!
//! Each resource gets its own [`InMemoryRepository`], seeded with mock
//! data and configured with the latency a remote call would have. Tests
//! construct the same repository with [`Latency::none`] and use
//! [`InMemoryRepository::fail_next`] to exercise failure paths.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{Record, ResourceService, ServiceError};

/// Where newly created records land in the collection.
///
/// Users prepend (most-recent-first); every other resource appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    #[default]
    Append,
    Prepend,
}

/// Artificial latency per operation class.
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    pub list: Duration,
    pub mutate: Duration,
}

impl Latency {
    /// The delays a user would see against a real backend.
    pub fn interactive() -> Self {
        Self {
            list: Duration::from_millis(300),
            mutate: Duration::from_millis(500),
        }
    }

    /// No delay; for tests.
    pub fn none() -> Self {
        Self {
            list: Duration::ZERO,
            mutate: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::interactive()
    }
}

/// A mutable in-memory collection behind the [`ResourceService`] contract.
#[derive(Debug)]
pub struct InMemoryRepository<R> {
    records: Mutex<Vec<R>>,
    latency: Latency,
    insert: InsertPosition,
    fail_next: Mutex<Option<ServiceError>>,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new(seed: Vec<R>) -> Self {
        Self {
            records: Mutex::new(seed),
            latency: Latency::default(),
            insert: InsertPosition::default(),
            fail_next: Mutex::new(None),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_insert(mut self, insert: InsertPosition) -> Self {
        self.insert = insert;
        self
    }

    /// Makes the next call fail with `error` instead of touching the
    /// collection.
    pub fn fail_next(&self, error: ServiceError) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the backing collection, for assertions.
    pub fn snapshot(&self) -> Vec<R> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn take_failure(&self) -> Option<ServiceError> {
        self.fail_next
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

#[async_trait]
impl<R: Record> ResourceService<R> for InMemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        sleep(self.latency.list).await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.snapshot())
    }

    async fn create(&self, record: R) -> Result<R, ServiceError> {
        sleep(self.latency.mutate).await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        match self.insert {
            InsertPosition::Append => records.push(record.clone()),
            InsertPosition::Prepend => records.insert(0, record.clone()),
        }
        Ok(record)
    }

    async fn update(&self, id: &str, record: R) -> Result<R, ServiceError> {
        sleep(self.latency.mutate).await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = records.iter_mut().find(|r| r.id() == id) {
            *slot = record.clone();
        }
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        sleep(self.latency.mutate).await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.retain(|r| r.id() != id);
        Ok(())
    }
}
