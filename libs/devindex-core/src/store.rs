//! Progress store contract and an in-memory implementation.
//!
//! Progress updates are read-modify-write per term id. Implementations must
//! run [`ProgressStore::upsert`] atomically per key so overlapping review and
//! quiz flows never lose an increment. Different keys need no coordination.

use crate::date_utils::local_date;
use crate::error::Result;
use crate::scheduler::Sm2;
use crate::types::{Progress, Quality};
use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

/// Key-value store of progress records keyed by term id.
pub trait ProgressStore: Send + Sync {
    fn get(&self, term_id: &str) -> Result<Option<Progress>>;
    fn put(&self, progress: &Progress) -> Result<()>;
    fn get_all(&self) -> Result<Vec<Progress>>;
    /// Insert or replace many records at once.
    fn bulk_load(&self, records: &[Progress]) -> Result<()>;
    /// Remove every record.
    fn clear(&self) -> Result<()>;

    /// Atomically replace the record for `term_id` with `update(existing)`.
    fn upsert(
        &self,
        term_id: &str,
        update: &mut dyn FnMut(Option<Progress>) -> Progress,
    ) -> Result<Progress>;
}

/// Apply an SRS review to one term and persist it.
///
/// Creates the record on first review. `now` becomes `last_reviewed_at`;
/// its local date anchors `next_review`.
pub fn record_review(
    store: &dyn ProgressStore,
    term_id: &str,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<Progress> {
    let sm2 = Sm2::default();
    let today = local_date(now);

    let updated = store.upsert(term_id, &mut |existing: Option<Progress>| {
        let next = sm2.schedule(existing.as_ref(), quality, today);
        let mut progress = existing.unwrap_or_else(|| Progress::new(term_id, now));
        progress.apply_review(&next, now);
        progress
    })?;

    tracing::debug!(
        term_id,
        interval = updated.interval,
        mastery = updated.mastery_level.to_value(),
        "review recorded"
    );
    Ok(updated)
}

const SHARD_COUNT: usize = 16;

/// In-memory store sharded by key hash. Each shard has its own lock, so
/// updates to one key are serialized while other shards proceed.
pub struct MemoryProgressStore {
    shards: Vec<Mutex<HashMap<String, Progress>>>,
}

impl Default for MemoryProgressStore {
    fn default() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shard(&self, term_id: &str) -> &Mutex<HashMap<String, Progress>> {
        let mut hasher = DefaultHasher::new();
        term_id.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, term_id: &str) -> Result<Option<Progress>> {
        let shard = self.shard(term_id).lock().unwrap_or_else(PoisonError::into_inner);
        Ok(shard.get(term_id).cloned())
    }

    fn put(&self, progress: &Progress) -> Result<()> {
        let mut shard = self
            .shard(&progress.term_id)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        shard.insert(progress.term_id.clone(), progress.clone());
        Ok(())
    }

    /// All records, ordered by term id.
    fn get_all(&self) -> Result<Vec<Progress>> {
        let mut all: Vec<Progress> = self
            .shards
            .iter()
            .flat_map(|shard| {
                let shard = shard.lock().unwrap_or_else(PoisonError::into_inner);
                shard.values().cloned().collect::<Vec<_>>()
            })
            .collect();
        all.sort_by(|a, b| a.term_id.cmp(&b.term_id));
        Ok(all)
    }

    fn bulk_load(&self, records: &[Progress]) -> Result<()> {
        for progress in records {
            self.put(progress)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for shard in &self.shards {
            shard.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
        Ok(())
    }

    fn upsert(
        &self,
        term_id: &str,
        update: &mut dyn FnMut(Option<Progress>) -> Progress,
    ) -> Result<Progress> {
        let mut shard = self.shard(term_id).lock().unwrap_or_else(PoisonError::into_inner);
        let updated = update(shard.get(term_id).cloned());
        shard.insert(term_id.to_string(), updated.clone());
        Ok(updated)
    }
}
