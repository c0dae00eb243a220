//! Same seed, same profile, same row count: byte-identical tables.
//! Any divergence means a stream is being consumed out of order.

use adsales_core::{
    config::{GenerationProfile, GeneratorConfig},
    generator::{self, DatasetSynthesizer},
};
use std::fs;
use std::path::Path;

fn generate_to(path: &Path, seed: u64, rows: usize) {
    let config = GeneratorConfig {
        rows,
        seed: Some(seed),
        output_path: path.to_path_buf(),
        profile: GenerationProfile::default(),
    };
    generator::run(&config).expect("generation run");
}

#[test]
fn same_seed_produces_identical_files() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");

    generate_to(&a, SEED, 500);
    generate_to(&b, SEED, 500);

    let bytes_a = fs::read(&a).unwrap();
    let bytes_b = fs::read(&b).unwrap();
    assert_eq!(bytes_a.len(), bytes_b.len(), "file lengths differ");
    for (i, (la, lb)) in String::from_utf8_lossy(&bytes_a)
        .lines()
        .zip(String::from_utf8_lossy(&bytes_b).lines())
        .enumerate()
    {
        assert_eq!(la, lb, "tables diverged at line {i}");
    }
}

#[test]
fn unseeded_run_reports_a_reproducible_seed() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("unseeded.csv");
    let again = dir.path().join("reseeded.csv");

    let summary = generator::run(&GeneratorConfig {
        rows: 200,
        seed: None,
        output_path: first.clone(),
        profile: GenerationProfile::default(),
    })
    .expect("unseeded run");
    generate_to(&again, summary.seed, 200);

    assert_eq!(fs::read(&first).unwrap(), fs::read(&again).unwrap());
}

#[test]
fn different_seeds_produce_different_tables() {
    let mut a = DatasetSynthesizer::new(GenerationProfile::default(), 42).unwrap();
    let mut b = DatasetSynthesizer::new(GenerationProfile::default(), 43).unwrap();
    assert_ne!(a.generate(50), b.generate(50));
}

#[test]
fn prefix_is_stable_across_row_counts() {
    // Row k depends only on the seed and the rows before it.
    let mut short = DatasetSynthesizer::new(GenerationProfile::default(), 7).unwrap();
    let mut long = DatasetSynthesizer::new(GenerationProfile::default(), 7).unwrap();
    let short_rows = short.generate(20);
    let long_rows = long.generate(60);
    assert_eq!(short_rows[..], long_rows[..20]);
}
