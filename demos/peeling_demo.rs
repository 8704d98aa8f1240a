//! Generate a batch of keys, build a structure, and report timings for
//! each phase.

use invertible_bloom::{IbDict, Murmur3Mix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

const N_KEYS: usize = 200_000;
const DIRECTORY_SIZE: usize = 400_000; // ~2x load, comfortably above the K=3 peeling threshold
const GEN_SEED: u64 = 42;

fn main() {
    println!("--- invertible_bloom peeling demo ---");
    println!("n = {N_KEYS}, m = {DIRECTORY_SIZE}");

    let t0 = Instant::now();
    let keys = gen_unique_keys(N_KEYS, GEN_SEED);
    let gen_s = t0.elapsed().as_secs_f64();
    println!("gen:      {:>8.3} s   ({:.1} M keys/s)", gen_s, N_KEYS as f64 / gen_s / 1e6);

    let t1 = Instant::now();
    let mut dict: IbDict<u64, u64, Murmur3Mix> = IbDict::with_seed(DIRECTORY_SIZE, GEN_SEED);
    for &k in &keys {
        dict.insert(k, k.wrapping_mul(0x9E3779B97F4A7C15)).unwrap();
    }
    let build_s = t1.elapsed().as_secs_f64();
    println!("build:    {:>8.3} s   ({:.1} M inserts/s)", build_s, N_KEYS as f64 / build_s / 1e6);

    let t2 = Instant::now();
    let mut acc = 0u64;
    for &k in &keys {
        if dict.contains(&k) == invertible_bloom::Presence::Exists {
            acc = acc.wrapping_add(1);
        }
    }
    let contains_s = t2.elapsed().as_secs_f64();
    println!(
        "contains: {:>8.3} s   ({:.1} M probes/s)   (hits={acc})",
        contains_s,
        N_KEYS as f64 / contains_s / 1e6
    );

    let t3 = Instant::now();
    let decoded = dict.list_all();
    let list_s = t3.elapsed().as_secs_f64();
    match decoded {
        Some(pairs) => println!("list_all: {:>8.3} s   (decoded {} entries)", list_s, pairs.len()),
        None => println!("list_all: {:>8.3} s   (decoding failed — load too high)", list_s),
    }

    println!("----------------------------------------------");
    println!("Total: {:.3} s", gen_s + build_s + contains_s + list_s);
}

fn gen_unique_keys(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(n * 2);
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let k: u64 = rng.gen();
        if seen.insert(k) {
            keys.push(k);
        }
    }
    keys
}
