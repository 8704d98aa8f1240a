//! Shared bucket/directory core used by both [`crate::IbSet`] and
//! [`crate::IbDict`], parameterized over the bucket payload so the set
//! and dictionary variants share one peeling engine instead of two
//! near-identical copies.

use crate::error::BloomError;
use crate::hash::KeyHasher;
use crate::traits::{BloomCounter, BloomKey, BloomValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Outcome of a membership probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// A pure bucket matched the queried key exactly.
    Exists,
    /// Every probed bucket had `count > 1`; the key may or may not be present.
    MightExist,
    /// An empty bucket was probed, or no bucket held any trace of the key.
    NotFound,
}

/// One directory cell: an XOR accumulator over keys (and values) plus an
/// occupancy count.
#[derive(Debug, Clone, Copy)]
pub struct Bucket<Key, Value, Counter> {
    pub cumulative_key: Key,
    pub cumulative_value: Value,
    pub count: Counter,
}

impl<Key: BloomKey, Value: BloomValue, Counter: BloomCounter> Default for Bucket<Key, Value, Counter> {
    fn default() -> Self {
        Self {
            cumulative_key: Key::default(),
            cumulative_value: Value::default(),
            count: Counter::default(),
        }
    }
}

impl<Key: BloomKey, Value: BloomValue, Counter: BloomCounter> Bucket<Key, Value, Counter> {
    #[inline]
    pub fn is_pure(&self) -> bool {
        self.count.is_one()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count.is_zero()
    }
}

/// A fixed-length sequence of buckets, never resized after construction.
#[derive(Debug, Clone)]
pub struct Directory<Key, Value, Counter> {
    buckets: Vec<Bucket<Key, Value, Counter>>,
}

impl<Key: BloomKey, Value: BloomValue, Counter: BloomCounter> Directory<Key, Value, Counter> {
    pub fn new(m: usize) -> Self {
        let mut buckets = Vec::with_capacity(m);
        buckets.resize_with(m, Bucket::default);
        Self { buckets }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[inline]
    pub fn buckets(&self) -> &[Bucket<Key, Value, Counter>] {
        &self.buckets
    }

    /// XOR a key (and value) into bucket `index` and bump its count.
    pub fn xor_in(&mut self, index: usize, key: Key, value: Value) -> Result<(), BloomError> {
        let bucket = &mut self.buckets[index];
        bucket.cumulative_key ^= key;
        bucket.cumulative_value ^= value;
        bucket.count = bucket
            .count
            .checked_inc()
            .ok_or(BloomError::CounterOverflow(index))?;
        Ok(())
    }

    /// XOR a key (and value) out of bucket `index` and drop its count.
    ///
    /// Asserts that `count` never goes negative.
    pub fn xor_out(&mut self, index: usize, key: Key, value: Value) {
        let bucket = &mut self.buckets[index];
        debug_assert!(bucket.count.is_positive(), "removing from an empty bucket");
        bucket.cumulative_key ^= key;
        bucket.cumulative_value ^= value;
        bucket.count = bucket.count.checked_dec().expect("bucket count underflow");
    }
}

/// `hash_index(key, seed) = (H(key) XOR seed) mod M`.
#[inline]
pub fn hash_index<Key, H: KeyHasher<Key>>(key: &Key, seed: u64, m: usize) -> usize {
    debug_assert!(m > 0);
    ((H::hash(key) ^ seed) % m as u64) as usize
}

/// Compute the `K` raw probe indices for `key`, in seed order.
#[inline]
pub fn raw_indices<Key, H: KeyHasher<Key>, const K: usize>(
    key: &Key,
    seeds: &[u64; K],
    m: usize,
) -> [usize; K] {
    let mut out = [0usize; K];
    for (slot, seed) in out.iter_mut().zip(seeds.iter()) {
        *slot = hash_index::<Key, H>(key, *seed, m);
    }
    out
}

/// Collapse `raw` into its distinct entries, in first-seen order.
///
/// An index touched by two seeds must be mutated once, never twice, because
/// XOR-accumulators double-XOR back to identity. `K` is small (default 3)
/// so a linear scan over a stack array beats allocating a `HashSet` for
/// this.
#[inline]
pub fn distinct<const K: usize>(raw: [usize; K]) -> ([usize; K], usize) {
    let mut out = [0usize; K];
    let mut n = 0;
    for idx in raw {
        if !out[..n].contains(&idx) {
            out[n] = idx;
            n += 1;
        }
    }
    (out, n)
}

/// Draw `K` pairwise-distinct 64-bit seeds by rejection sampling.
pub fn draw_seeds<const K: usize>(generator_seed: Option<u64>) -> [u64; K] {
    let mut rng = match generator_seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut seeds = [0u64; K];
    let mut filled = 0;
    while filled < K {
        let candidate: u64 = rng.gen();
        if !seeds[..filled].contains(&candidate) {
            seeds[filled] = candidate;
            filled += 1;
        }
    }
    seeds
}

/// Probe `key` in probe order, short-circuiting on the first definitive
/// answer. De-duplication is not needed here: the loop stops at the
/// first pure or empty bucket, so a repeated index is simply probed
/// again with the same (already-known) answer.
pub fn contains<Key, Value, Counter, H, const K: usize>(
    directory: &Directory<Key, Value, Counter>,
    seeds: &[u64; K],
    key: &Key,
) -> Presence
where
    Key: BloomKey,
    Value: BloomValue,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    if directory.is_empty() {
        return Presence::NotFound;
    }
    let mut any_overlap = false;
    for seed in seeds {
        let idx = hash_index::<Key, H>(key, *seed, directory.len());
        let bucket = &directory.buckets()[idx];
        if bucket.is_empty() {
            return Presence::NotFound;
        }
        if bucket.is_pure() {
            return if bucket.cumulative_key == *key {
                Presence::Exists
            } else {
                Presence::NotFound
            };
        }
        any_overlap = true;
    }
    if any_overlap {
        Presence::MightExist
    } else {
        Presence::NotFound
    }
}

/// Probe for a uniquely-recoverable value (dictionary only).
pub fn get<Key, Value, Counter, H, const K: usize>(
    directory: &Directory<Key, Value, Counter>,
    seeds: &[u64; K],
    key: &Key,
) -> Option<Value>
where
    Key: BloomKey,
    Value: BloomValue,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    if directory.is_empty() {
        return None;
    }
    for seed in seeds {
        let idx = hash_index::<Key, H>(key, *seed, directory.len());
        let bucket = &directory.buckets()[idx];
        if bucket.is_pure() {
            return if bucket.cumulative_key == *key {
                Some(bucket.cumulative_value)
            } else {
                None
            };
        }
    }
    None
}

/// Insert `key`/`value` into every distinct probed bucket.
pub fn insert<Key, Value, Counter, H, const K: usize>(
    directory: &mut Directory<Key, Value, Counter>,
    seeds: &[u64; K],
    key: &Key,
    value: &Value,
) -> Result<(), BloomError>
where
    Key: BloomKey,
    Value: BloomValue,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    if directory.is_empty() {
        return Ok(());
    }
    let raw = raw_indices::<Key, H, K>(key, seeds, directory.len());
    let (idxs, n) = distinct(raw);
    for &idx in &idxs[..n] {
        directory.xor_in(idx, *key, *value)?;
    }
    Ok(())
}

/// Remove `key`/`value` from every distinct probed bucket. The caller is
/// responsible for the precondition check — `contains`/`get` succeeding —
/// before calling this.
pub fn remove<Key, Value, Counter, H, const K: usize>(
    directory: &mut Directory<Key, Value, Counter>,
    seeds: &[u64; K],
    key: &Key,
    value: &Value,
) where
    Key: BloomKey,
    Value: BloomValue,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    if directory.is_empty() {
        return;
    }
    let raw = raw_indices::<Key, H, K>(key, seeds, directory.len());
    let (idxs, n) = distinct(raw);
    for &idx in &idxs[..n] {
        directory.xor_out(idx, *key, *value);
    }
}

/// The peeling decoder. Operates on a clone of `directory` (the caller's
/// original is never touched) and returns the decoded `(key, value)`
/// pairs on success.
///
/// Duplicate-key workloads are a known, accepted edge case: inserting the
/// same key twice cancels its XOR contribution back to zero in every
/// bucket it touches while the count still reaches two, which looks
/// exactly like two distinct colliding keys and may simply fail to peel.
/// This function does not special-case it.
pub fn list_all<Key, Value, Counter, H, const K: usize>(
    directory: &Directory<Key, Value, Counter>,
    seeds: &[u64; K],
    live_count: usize,
) -> Option<Vec<(Key, Value)>>
where
    Key: BloomKey,
    Value: BloomValue,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    let mut work = directory.clone();
    let m = work.len();
    let mut collected: Vec<(Key, Value)> = Vec::new();

    let mut finished = m == 0;
    let mut has_changed = true;
    while !finished && has_changed {
        has_changed = false;
        for i in 0..m {
            let bucket = work.buckets()[i];
            if !bucket.is_pure() {
                continue;
            }
            let key = bucket.cumulative_key;
            let value = bucket.cumulative_value;
            collected.push((key, value));
            has_changed = true;

            let raw = raw_indices::<Key, H, K>(&key, seeds, m);
            let (idxs, n) = distinct(raw);
            for &idx in &idxs[..n] {
                work.xor_out(idx, key, value);
            }
        }
        finished = work.buckets().iter().all(|b| b.is_empty());
    }

    if finished && collected.len() == live_count {
        Some(collected)
    } else {
        None
    }
}
