// tests/dice_tests.rs

//! End-to-end tests of the die: decoding, aggregation, the seeded baseline
//! experiment and the parallel fan-out.

use qdie::core::QdieError;
use qdie::dice::stats::evaluate;
use qdie::dice::{DIE_FACES, DieRoller, FrequencyTable, decode_face};
use qdie::noise::{NoiseSpec, ReadoutParams};
use qdie::parallel::run_indexed;

#[test]
fn decode_is_a_bijection_over_three_bits() {
    let mut seen = [false; 8];
    for value in 0..8u8 {
        let bits = [(value >> 2) & 1, (value >> 1) & 1, value & 1];
        let face = decode_face(&bits);
        assert!((1..=8).contains(&face));
        assert!(!seen[face as usize - 1], "face {} produced twice", face);
        seen[face as usize - 1] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn decode_reads_bits_big_endian() {
    assert_eq!(decode_face(&[0, 0, 0]), 1);
    assert_eq!(decode_face(&[0, 0, 1]), 2);
    assert_eq!(decode_face(&[1, 0, 0]), 5);
    assert_eq!(decode_face(&[1, 0, 1]), 6);
    assert_eq!(decode_face(&[1, 1, 1]), 8);
}

#[test]
fn aggregation_covers_every_face_and_sums_to_one_hundred() {
    // Face 8 never appears; its slot must still be present, at zero.
    let faces = [1u8, 1, 2, 3, 4, 5, 6, 7];
    let table = FrequencyTable::aggregate(&faces, DIE_FACES).unwrap();
    assert_eq!(table.n_faces(), DIE_FACES);
    assert_eq!(table.percentage(8), Some(0.0));
    assert_eq!(table.percentage(1), Some(25.0));
    assert_eq!(table.percentage(0), None);
    assert_eq!(table.percentage(9), None);
    let total: f64 = table.percentages().iter().sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn aggregating_nothing_is_an_error() {
    assert_eq!(
        FrequencyTable::aggregate(&[], DIE_FACES),
        Err(QdieError::EmptyResultSet)
    );
}

#[test]
fn seeded_baseline_is_statistically_uniform() {
    let mut roller = DieRoller::from_seed(2024);
    let faces = roller.roll(&NoiseSpec::Ideal, 10_000).unwrap();
    assert_eq!(faces.len(), 10_000);

    let table = FrequencyTable::aggregate(&faces, DIE_FACES).unwrap();
    for (face, pct) in table.iter() {
        // 12.5% +- 2 points is ~6 sigma at 10000 shots.
        assert!(
            (10.5..=14.5).contains(&pct),
            "face {} at {:.2}% is far from uniform",
            face,
            pct
        );
    }

    let record = evaluate(&faces, DIE_FACES, "baseline").unwrap();
    assert!(
        record.p_value > 1e-4,
        "fair die rejected: chi2={:.2}, p={:.6}",
        record.chi_square,
        record.p_value
    );
}

#[test]
fn degraded_readout_skews_the_distribution() {
    // p11 = 0.5 at 10000 shots: measured ones decay to zeros, so low faces
    // are strongly over-represented.
    let noise = NoiseSpec::Readout(ReadoutParams::new(1.0, 0.5).unwrap());
    let mut roller = DieRoller::from_seed(99);
    let faces = roller.roll(&noise, 10_000).unwrap();
    let record = evaluate(&faces, DIE_FACES, "degraded").unwrap();
    assert!(record.p_value < 1e-6, "skew not detected: p={}", record.p_value);
    let table = FrequencyTable::aggregate(&faces, DIE_FACES).unwrap();
    let face1 = table.percentage(1).unwrap();
    let face8 = table.percentage(8).unwrap();
    assert!(face1 > face8, "expected face 1 ({face1:.2}%) above face 8 ({face8:.2}%)");
}

#[test]
fn parallel_rolls_preserve_submission_order() {
    // Four independently seeded rollers run concurrently; each result must
    // land in its submission slot regardless of completion order.
    let seeds = [11u64, 22, 33, 44];
    let jobs: Vec<_> = seeds
        .iter()
        .map(|&seed| {
            move || {
                let mut roller = DieRoller::from_seed(seed);
                let faces = roller.roll(&NoiseSpec::Ideal, 500).unwrap();
                (seed, faces)
            }
        })
        .collect();

    let results = run_indexed(jobs, 2);
    assert_eq!(results.len(), 4);
    for (i, (seed, faces)) in results.iter().enumerate() {
        assert_eq!(*seed, seeds[i], "slot {} holds the wrong job's result", i);
        assert_eq!(faces.len(), 500);
        assert!(faces.iter().all(|f| (1..=8).contains(f)));
    }

    // Same seed, same stream: the parallel run must match a serial rerun.
    let mut serial = DieRoller::from_seed(11);
    assert_eq!(results[0].1, serial.roll(&NoiseSpec::Ideal, 500).unwrap());
}
