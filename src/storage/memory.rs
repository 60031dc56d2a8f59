//! In-process record store
//!
//! Each predicate check and its mutation run under the DashMap shard lock
//! for that key (entry API / `remove_if`), which gives per-key atomicity.
//! The owner index is a filtered scan ordered by insertion sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::models::{Predicate, ShortenedUrl};
use super::RecordStore;
use crate::errors::{Result, ShortkeepError};

struct StoredRecord {
    seq: u64,
    record: ShortenedUrl,
}

#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, StoredRecord>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, record: ShortenedUrl, predicate: Predicate) -> Result<ShortenedUrl> {
        // 记录不可变，只有 NotExists 能写入
        if !matches!(predicate, Predicate::NotExists) {
            return Err(rejected_put(&record, &predicate));
        }

        match self.records.entry(record.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(StoredRecord {
                    seq: self.next_seq(),
                    record: record.clone(),
                });
                debug!("memory put: {}", record.id);
                Ok(record)
            }
            Entry::Occupied(_) => Err(rejected_put(&record, &predicate)),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<ShortenedUrl>> {
        Ok(self.records.get(id).map(|stored| stored.record.clone()))
    }

    async fn delete(&self, id: &str, predicate: Predicate) -> Result<()> {
        match self
            .records
            .remove_if(id, |_, stored| predicate.holds(Some(&stored.record)))
        {
            Some(_) => {
                debug!("memory delete: {}", id);
                Ok(())
            }
            None => Err(ShortkeepError::predicate_failed(format!(
                "delete({}) rejected by {:?}",
                id, predicate
            ))),
        }
    }

    async fn query_by_owner(&self, owner: &str) -> Result<Vec<ShortenedUrl>> {
        let mut matches: Vec<(u64, ShortenedUrl)> = self
            .records
            .iter()
            .filter(|entry| entry.record.owner == owner)
            .map(|entry| (entry.seq, entry.record.clone()))
            .collect();
        matches.sort_by_key(|(seq, _)| *seq);
        Ok(matches.into_iter().map(|(_, record)| record).collect())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

fn rejected_put(record: &ShortenedUrl, predicate: &Predicate) -> ShortkeepError {
    ShortkeepError::predicate_failed(format!("put({}) rejected by {:?}", record.id, predicate))
}
