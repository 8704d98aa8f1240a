//! The probabilistic set variant (IBF).

use crate::engine::{self, Directory, Presence};
use crate::error::BloomError;
use crate::hash::KeyHasher;
use crate::traits::{BloomCounter, BloomKey, NoValue};
use std::marker::PhantomData;

/// An Invertible Bloom Filter: a probabilistic set with no false
/// negatives and, load permitting, full peelable enumeration.
///
/// `Key` is the stored element type, `H` the caller-supplied hasher,
/// `Counter` the per-bucket occupancy width (default `u16`), and `K` the
/// number of probes per key (default 3).
///
/// `Clone` produces an independent copy. This is implemented by hand
/// rather than derived — `H` only ever appears in a `PhantomData`
/// marker, and `#[derive(Clone)]` would otherwise demand `H: Clone` for
/// no reason.
pub struct IbSet<Key, H, Counter = u16, const K: usize = 3>
where
    Key: BloomKey,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    directory: Directory<Key, NoValue, Counter>,
    seeds: [u64; K],
    count: usize,
    _hasher: PhantomData<H>,
}

impl<Key, H, Counter, const K: usize> Clone for IbSet<Key, H, Counter, K>
where
    Key: BloomKey,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            seeds: self.seeds,
            count: self.count,
            _hasher: PhantomData,
        }
    }
}

impl<Key, H, Counter, const K: usize> IbSet<Key, H, Counter, K>
where
    Key: BloomKey,
    Counter: BloomCounter,
    H: KeyHasher<Key>,
{
    /// Construct an empty set with `directory_size` buckets, seeding the
    /// generator from the entropy source.
    pub fn new(directory_size: usize) -> Self {
        Self::build(directory_size, None)
    }

    /// Construct an empty set with a deterministic generator seed, so the
    /// resulting `K` seeds (and thus all hashing) are reproducible.
    pub fn with_seed(directory_size: usize, generator_seed: u64) -> Self {
        Self::build(directory_size, Some(generator_seed))
    }

    fn build(directory_size: usize, generator_seed: Option<u64>) -> Self {
        Self {
            directory: Directory::new(directory_size),
            seeds: engine::draw_seeds(generator_seed),
            count: 0,
            _hasher: PhantomData,
        }
    }

    /// Insert `key`. Never fails except on bucket counter overflow.
    pub fn insert(&mut self, key: Key) -> Result<(), BloomError> {
        engine::insert::<Key, NoValue, Counter, H, K>(
            &mut self.directory,
            &self.seeds,
            &key,
            &NoValue,
        )?;
        self.count += 1;
        Ok(())
    }

    /// Probe membership.
    pub fn contains(&self, key: &Key) -> Presence {
        engine::contains::<Key, NoValue, Counter, H, K>(&self.directory, &self.seeds, key)
    }

    /// Remove `key` if it is uniquely identifiable; returns `false` and
    /// leaves the set unchanged otherwise.
    pub fn remove(&mut self, key: &Key) -> bool {
        if self.contains(key) != Presence::Exists {
            return false;
        }
        engine::remove::<Key, NoValue, Counter, H, K>(
            &mut self.directory,
            &self.seeds,
            key,
            &NoValue,
        );
        self.count -= 1;
        true
    }

    /// Attempt to enumerate every currently-inserted key.
    ///
    /// Operates on a snapshot copy; the original is left untouched even
    /// on success. See [`engine::list_all`] for the duplicate-key caveat.
    pub fn list_all(&self) -> Option<Vec<Key>> {
        engine::list_all::<Key, NoValue, Counter, H, K>(&self.directory, &self.seeds, self.count)
            .map(|pairs| pairs.into_iter().map(|(k, _)| k).collect())
    }

    pub fn size(&self) -> usize {
        self.count
    }

    pub fn directory_size(&self) -> usize {
        self.directory.len()
    }

    pub fn list_seeds(&self) -> [u64; K] {
        self.seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Murmur3Mix;

    type TestSet = IbSet<u64, Murmur3Mix>;

    #[test]
    fn construct_empty() {
        let s = TestSet::with_seed(0, 0);
        assert_eq!(s.size(), 0);
        assert_eq!(s.directory_size(), 0);
        let seeds = s.list_seeds();
        assert_ne!(seeds[0], seeds[1]);
        assert_ne!(seeds[1], seeds[2]);
        assert_ne!(seeds[0], seeds[2]);
    }

    #[test]
    fn construct_sized() {
        let s = TestSet::with_seed(10, 0);
        assert_eq!(s.size(), 0);
        assert_eq!(s.directory_size(), 10);
    }

    #[test]
    fn insert_and_contains() {
        let mut s = TestSet::with_seed(10, 0);
        assert_eq!(s.contains(&1337), Presence::NotFound);
        s.insert(1337).unwrap();
        assert_eq!(s.contains(&1337), Presence::Exists);
        assert_eq!(s.size(), 1);
    }

    #[test]
    fn remove_restores_empty_state() {
        let mut s = TestSet::with_seed(10, 0);
        s.insert(1337).unwrap();
        assert!(s.remove(&1337));
        assert_eq!(s.contains(&1337), Presence::NotFound);
        assert_eq!(s.size(), 0);
        assert!(s.directory.buckets().iter().all(|b| b.is_empty()));
    }

    #[test]
    fn remove_unknown_key_fails() {
        let mut s = TestSet::with_seed(10, 0);
        s.insert(1337).unwrap();
        assert!(!s.remove(&42));
        assert_eq!(s.size(), 1);
    }

    #[test]
    fn list_all_round_trips_under_light_load() {
        let mut s = IbSet::<u64, Murmur3Mix>::with_seed(64, 7);
        let keys: Vec<u64> = (0..10).map(|i| i * 101 + 3).collect();
        for &k in &keys {
            s.insert(k).unwrap();
        }
        let mut decoded = s.list_all().expect("decode should succeed at this load");
        decoded.sort_unstable();
        let mut expected = keys.clone();
        expected.sort_unstable();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn list_all_leaves_instance_untouched() {
        let mut s = IbSet::<u64, Murmur3Mix>::with_seed(64, 7);
        for i in 0..10u64 {
            s.insert(i * 17 + 1).unwrap();
        }
        let before_count = s.size();
        let before_seeds = s.list_seeds();
        let _ = s.list_all();
        assert_eq!(s.size(), before_count);
        assert_eq!(s.list_seeds(), before_seeds);
    }

    #[test]
    fn list_all_fails_under_overload() {
        let mut s = IbSet::<u64, Murmur3Mix>::with_seed(2, 0);
        for i in 0..50u64 {
            s.insert(i).unwrap();
        }
        assert!(s.list_all().is_none());
        assert_eq!(s.size(), 50);
    }

    #[test]
    fn zero_directory_is_a_well_defined_edge_case() {
        let mut s = TestSet::with_seed(0, 0);
        s.insert(5).unwrap();
        assert_eq!(s.size(), 1);
        assert_eq!(s.contains(&5), Presence::NotFound);
    }
}
