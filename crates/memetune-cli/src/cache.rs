//! In-memory memoization of preview audio.
//!
//! Entries are keyed by a BLAKE3 hash over every parameter that affects the
//! preview. Concurrent requests for one key compute the preview once: the
//! first caller computes while holding the key's slot, later callers block
//! on the slot and receive the same bytes. A failed computation is not
//! stored; a caller already waiting on the slot retries, otherwise the slot
//! is dropped. Eviction only removes entries no caller is holding.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Default number of previews kept.
pub const DEFAULT_CAPACITY: usize = 64;

/// Cache key components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewKey {
    /// Generation mode name
    pub mode: String,
    /// Prompt, when the mode uses one
    pub prompt: Option<String>,
    /// Lyrics, when the mode uses them
    pub lyrics: Option<String>,
    /// Tempo in BPM
    pub tempo_bpm: f64,
    /// Genre display name
    pub genre: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Resolved seed
    pub seed: u32,
    /// Preview length in seconds
    pub preview_seconds: f64,
}

impl PreviewKey {
    /// Compute the entry hash.
    ///
    /// Floats are hashed by bit pattern so distinct values never collide.
    pub fn compute_hash(&self) -> String {
        let canonical = format!(
            "mode:{},prompt:{:?},lyrics:{:?},tempo:{:016x},genre:{:?},sr:{},seed:{},preview:{:016x}",
            self.mode,
            self.prompt,
            self.lyrics,
            self.tempo_bpm.to_bits(),
            self.genre,
            self.sample_rate,
            self.seed,
            self.preview_seconds.to_bits()
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

type Slot = Arc<Mutex<Option<Arc<Vec<u8>>>>>;

#[derive(Default)]
struct Entries {
    slots: HashMap<String, Slot>,
    order: VecDeque<String>,
}

/// Bounded single-flight cache of preview WAV bytes.
pub struct PreviewCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl PreviewCache {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Returns the cached bytes for `key`, computing them with `compute` if
    /// absent.
    ///
    /// Errors from `compute` are returned to this caller only and are not
    /// stored.
    pub fn get_or_try_insert<E, F>(&self, key: &PreviewKey, compute: F) -> Result<Arc<Vec<u8>>, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        let hash = key.compute_hash();
        let slot = self.slot(&hash);

        let mut value = lock(&slot);
        if let Some(bytes) = value.as_ref() {
            log::debug!("preview cache hit {}", &hash[..12]);
            return Ok(Arc::clone(bytes));
        }

        log::debug!("preview cache miss {}", &hash[..12]);
        let bytes = match compute() {
            Ok(bytes) => Arc::new(bytes),
            Err(err) => {
                self.discard(&hash, &slot);
                return Err(err);
            }
        };
        *value = Some(Arc::clone(&bytes));
        self.evict();
        Ok(bytes)
    }

    /// Returns the cached bytes for `key` without computing.
    pub fn get(&self, key: &PreviewKey) -> Option<Arc<Vec<u8>>> {
        let slot = lock(&self.entries).slots.get(&key.compute_hash()).cloned()?;
        let value = lock(&slot);
        value.clone()
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        lock(&self.entries).slots.len()
    }

    /// Returns true if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut entries = lock(&self.entries);
        entries.slots.clear();
        entries.order.clear();
    }

    /// Finds or creates the slot for `hash`.
    fn slot(&self, hash: &str) -> Slot {
        let mut entries = lock(&self.entries);
        if let Some(slot) = entries.slots.get(hash) {
            return Arc::clone(slot);
        }

        let slot = Slot::default();
        entries.slots.insert(hash.to_string(), Arc::clone(&slot));
        entries.order.push_back(hash.to_string());
        slot
    }

    /// Drops the empty slot left by a failed computation, unless other
    /// callers are already waiting on it.
    fn discard(&self, hash: &str, slot: &Slot) {
        let mut entries = lock(&self.entries);
        let tracked = entries
            .slots
            .get(hash)
            .map_or(false, |current| Arc::ptr_eq(current, slot));
        // Held by the map and by the failed caller only
        if tracked && Arc::strong_count(slot) == 2 {
            entries.slots.remove(hash);
            entries.order.retain(|h| h != hash);
        }
    }

    /// Evicts the oldest idle entries until the cache is within capacity.
    ///
    /// A slot some caller still holds is in flight or being read and is
    /// skipped, so the cache can run over capacity until it is released.
    fn evict(&self) {
        let mut entries = lock(&self.entries);
        while entries.order.len() > self.capacity {
            let idle = entries.order.iter().position(|hash| {
                entries
                    .slots
                    .get(hash)
                    .map_or(true, |slot| Arc::strong_count(slot) == 1)
            });
            let Some(index) = idle else {
                break;
            };
            if let Some(hash) = entries.order.remove(index) {
                entries.slots.remove(&hash);
            }
        }
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Barrier};

    fn key(seed: u32) -> PreviewKey {
        PreviewKey {
            mode: "instrumental".into(),
            prompt: Some("dance".into()),
            lyrics: None,
            tempo_bpm: 100.0,
            genre: "Electronic".into(),
            sample_rate: 22050,
            seed,
            preview_seconds: 5.0,
        }
    }

    #[test]
    fn test_key_hash_is_stable_and_distinct() {
        assert_eq!(key(1).compute_hash(), key(1).compute_hash());
        assert_ne!(key(1).compute_hash(), key(2).compute_hash());

        let mut other = key(1);
        other.preview_seconds = 5.000_000_1;
        assert_ne!(key(1).compute_hash(), other.compute_hash());

        let mut none_vs_empty = key(1);
        none_vs_empty.lyrics = Some(String::new());
        assert_ne!(key(1).compute_hash(), none_vs_empty.compute_hash());
    }

    #[test]
    fn test_second_lookup_hits() {
        let cache = PreviewCache::default();
        let calls = AtomicUsize::new(0);
        let compute = || -> Result<Vec<u8>, ()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2, 3])
        };

        let a = cache.get_or_try_insert(&key(1), compute).unwrap();
        let b = cache.get_or_try_insert(&key(1), compute).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&key(1)).as_deref(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = PreviewCache::default();
        let err: Result<_, &str> = cache.get_or_try_insert(&key(1), || Err("tts missing"));
        assert_eq!(err.unwrap_err(), "tts missing");
        assert!(cache.get(&key(1)).is_none());

        let ok: Result<_, &str> = cache.get_or_try_insert(&key(1), || Ok(vec![9]));
        assert_eq!(*ok.unwrap(), vec![9]);
    }

    #[test]
    fn test_concurrent_callers_compute_once() {
        let cache = PreviewCache::default();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let results: Vec<Arc<Vec<u8>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache
                            .get_or_try_insert(&key(7), || -> Result<_, ()> {
                                calls.fetch_add(1, Ordering::SeqCst);
                                std::thread::sleep(std::time::Duration::from_millis(50));
                                Ok(vec![7; 1024])
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn test_failed_computation_keeps_cached_entries() {
        let cache = PreviewCache::new(2);
        for seed in 1..=2 {
            cache
                .get_or_try_insert(&key(seed), || -> Result<_, ()> { Ok(vec![seed as u8]) })
                .unwrap();
        }

        let err = cache.get_or_try_insert(&key(3), || Err("encoder crashed"));
        assert!(err.is_err());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key(1)).as_deref(), Some(&vec![1]));
        assert_eq!(cache.get(&key(2)).as_deref(), Some(&vec![2]));
    }

    #[test]
    fn test_in_flight_entry_survives_eviction() {
        let cache = PreviewCache::new(1);
        let calls = AtomicUsize::new(0);
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        std::thread::scope(|scope| {
            let cache = &cache;
            let calls = &calls;
            let first = scope.spawn(move || {
                cache.get_or_try_insert(&key(1), || -> Result<_, ()> {
                    calls.fetch_add(1, Ordering::SeqCst);
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(vec![1])
                })
            });

            started_rx.recv().unwrap();
            // Fills the only slot of capacity while key 1 is still computing
            cache
                .get_or_try_insert(&key(2), || -> Result<_, ()> { Ok(vec![2]) })
                .unwrap();
            assert_eq!(cache.len(), 2);

            release_tx.send(()).unwrap();
            assert_eq!(*first.join().unwrap().unwrap(), vec![1]);
        });

        let again = cache
            .get_or_try_insert(&key(1), || -> Result<_, ()> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1])
            })
            .unwrap();
        assert_eq!(*again, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key(2)).is_none());
    }

    #[test]
    fn test_oldest_entry_evicted() {
        let cache = PreviewCache::new(2);
        for seed in 1..=3 {
            cache
                .get_or_try_insert(&key(seed), || -> Result<_, ()> { Ok(vec![seed as u8]) })
                .unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(1)).is_none());
        assert!(cache.get(&key(2)).is_some());
        assert!(cache.get(&key(3)).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
