//! Integration tests for the matching strategies.

use skinweights::matching::{MatchMode, NearestIndex};

/// Deterministic pseudo-random coordinate stream (no rand dependency).
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self, scale: f32) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f32 / (1u64 << 31) as f32 - 0.5) * 2.0 * scale
    }
}

#[test]
fn strategies_agree_on_random_points_3d() {
    let mut rng = Lcg(0xdead_beef);
    let sources: Vec<[f32; 3]> = (0..2000)
        .map(|_| [rng.next_f32(10.0), rng.next_f32(10.0), rng.next_f32(10.0)])
        .collect();
    let targets: Vec<[f32; 3]> = (0..300)
        .map(|_| [rng.next_f32(12.0), rng.next_f32(12.0), rng.next_f32(12.0)])
        .collect();

    let scan = NearestIndex::scan(sources.clone()).unwrap();
    let tree = NearestIndex::tree(sources).unwrap();

    let a = scan.match_all(&targets);
    let b = tree.match_all(&targets);
    for (i, (x, y)) in a.iter().zip(&b).enumerate() {
        assert_eq!(x.source, y.source, "target {}", i);
        assert!((x.distance - y.distance).abs() < 1e-5, "target {}", i);
    }
}

#[test]
fn strategies_agree_on_random_points_2d() {
    let mut rng = Lcg(42);
    let sources: Vec<[f32; 2]> = (0..1500)
        .map(|_| [rng.next_f32(1.0), rng.next_f32(1.0)])
        .collect();
    let targets: Vec<[f32; 2]> = (0..200)
        .map(|_| [rng.next_f32(1.0), rng.next_f32(1.0)])
        .collect();

    let scan = NearestIndex::scan(sources.clone()).unwrap();
    let tree = NearestIndex::tree(sources).unwrap();
    assert_eq!(scan.match_all(&targets), tree.match_all(&targets));
}

#[test]
fn strategies_agree_on_duplicated_grid() {
    // A grid where every point appears twice: all matches are ties and both
    // strategies must pick the first occurrence.
    let mut sources: Vec<[f32; 2]> = Vec::new();
    for x in 0..10 {
        for y in 0..10 {
            sources.push([x as f32, y as f32]);
        }
    }
    let doubled: Vec<[f32; 2]> = sources.iter().chain(sources.iter()).copied().collect();

    let scan = NearestIndex::scan(doubled.clone()).unwrap();
    let tree = NearestIndex::tree(doubled).unwrap();

    for (i, &p) in sources.iter().enumerate() {
        let a = scan.nearest(p);
        let b = tree.nearest(p);
        assert_eq!(a.source, i, "first copy wins for {:?}", p);
        assert_eq!(b.source, i, "first copy wins for {:?}", p);
        assert_eq!(a.distance, 0.0);
    }
}

#[test]
fn auto_selection_matches_pinned_strategies() {
    let mut rng = Lcg(7);
    let small: Vec<[f32; 3]> = (0..50)
        .map(|_| [rng.next_f32(5.0), rng.next_f32(5.0), rng.next_f32(5.0)])
        .collect();
    let large: Vec<[f32; 3]> = (0..1000)
        .map(|_| [rng.next_f32(5.0), rng.next_f32(5.0), rng.next_f32(5.0)])
        .collect();
    let targets: Vec<[f32; 3]> = (0..100)
        .map(|_| [rng.next_f32(5.0), rng.next_f32(5.0), rng.next_f32(5.0)])
        .collect();

    for sources in [small, large] {
        let auto = NearestIndex::build(sources.clone()).unwrap();
        let scan = NearestIndex::scan(sources).unwrap();
        assert_eq!(auto.match_all(&targets), scan.match_all(&targets));
    }
}

#[test]
fn every_target_gets_a_match_regardless_of_distance() {
    // No distance cutoff: a far-away target still matches.
    let index = NearestIndex::build(vec![[0.0, 0.0, 0.0]]).unwrap();
    let m = index.nearest([1000.0, 0.0, 0.0]);
    assert_eq!(m.source, 0);
    assert!((m.distance - 1000.0).abs() < 1e-3);
}

#[test]
fn match_mode_round_trips_through_display() {
    for mode in [MatchMode::Position, MatchMode::Uv] {
        let parsed: MatchMode = mode.to_string().parse().unwrap();
        assert_eq!(parsed, mode);
    }
}
