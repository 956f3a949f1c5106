//! End-to-end scenarios across the family.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use rba_relief::{
    Distance, IReliefConfig, Neighborhood, ProjectedSpace, ReliefConfig, ReliefFConfig,
    SurfConfig, euclidean, irelief, manhattan, pairwise_distances, random_weights, relief,
    relieff, select_columns, surf, weighted_euclidean,
};

/// Unit square corners; feature 0 is the class, feature 1 is not.
fn square() -> (Vec<f64>, Vec<f64>) {
    (
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0],
        vec![0.0, 0.0, 1.0, 1.0],
    )
}

/// Three classes centred on 0, 5 and 10 in feature 1, with noise in features 0 and 2.
fn three_clusters(rng: &mut StdRng, per_class: usize) -> (Vec<f64>, Vec<f64>) {
    use rand::Rng;
    let mut data = Vec::new();
    let mut target = Vec::new();
    for class in 0..3 {
        for _ in 0..per_class {
            data.push(rng.random::<f64>() * 10.0);
            data.push(class as f64 * 5.0 + rng.random::<f64>() - 0.5);
            data.push(rng.random::<f64>() * 10.0);
            target.push(class as f64);
        }
    }
    (data, target)
}

/// Same layout as `three_clusters`, with the noise taken from fixed residues.
fn fixed_clusters(per_class: usize) -> (Vec<f64>, Vec<f64>) {
    let mut data = Vec::new();
    let mut target = Vec::new();
    for class in 0..3 {
        for i in 0..per_class {
            data.push(((i * 37 + class * 11) % 23) as f64 / 2.3);
            data.push(class as f64 * 5.0 + ((i * 7) % 11) as f64 / 11.0 - 0.5);
            data.push(((i * 53 + class * 29) % 19) as f64 / 1.9);
            target.push(class as f64);
        }
    }
    (data, target)
}

#[test]
fn relief_square_separating_feature_wins() {
    let (data, target) = square();
    let cfg = ReliefConfig::new().with_n_samples(4);
    let mut rng = StdRng::seed_from_u64(123);
    let r = relief(&data, 2, &target, &euclidean, &cfg, &mut rng).unwrap();
    assert!(r.weights()[0] > r.weights()[1], "{:?}", r.weights());
    assert_eq!(r.ranks(), &[1, 2]);
}

#[test]
fn every_member_finds_the_cluster_feature() {
    let mut rng = StdRng::seed_from_u64(2024);
    let (data, target) = three_clusters(&mut rng, 15);

    let cfg = ReliefConfig::new().with_n_samples(30);
    let r = relief(&data, 3, &target, &manhattan, &cfg, &mut rng).unwrap();
    assert_eq!(r.ranks()[1], 1, "relief {:?}", r.weights());

    let r = relieff(&data, 3, &target, &manhattan, &ReliefFConfig::new(5), &mut rng).unwrap();
    assert_eq!(r.ranks()[1], 1, "relieff {:?}", r.weights());

    let r = irelief(&data, 3, &target, &weighted_euclidean, &IReliefConfig::new()).unwrap();
    assert_eq!(r.ranks()[1], 1, "irelief {:?}", r.weights());
}

#[test]
fn select_top_features_pipeline() {
    let mut rng = StdRng::seed_from_u64(7);
    let (data, target) = three_clusters(&mut rng, 10);
    let r = relieff(&data, 3, &target, &euclidean, &ReliefFConfig::default(), &mut rng).unwrap();

    let keep = r.top(1);
    assert_eq!(keep, vec![1]);
    let reduced = select_columns(&data, 3, &keep).unwrap();
    assert_eq!(reduced.len(), 30);
    for (i, &v) in reduced.iter().enumerate() {
        assert_eq!(v, data[i * 3 + 1]);
    }
}

#[test]
fn threshold_selection_on_irelief() {
    let (data, target) = square();
    let r = irelief(&data, 2, &target, &weighted_euclidean, &IReliefConfig::new()).unwrap();
    // The non-separating feature is clipped to zero.
    assert_eq!(r.above(0.5), vec![0]);
    assert_eq!(r.above(0.0), vec![0, 1]);
}

#[test]
fn random_baseline_alongside_learned_ranking() {
    let mut rng = StdRng::seed_from_u64(99);
    let (data, target) = three_clusters(&mut rng, 12);
    let cfg = ReliefFConfig::default();
    let learned = relieff(&data, 3, &target, &euclidean, &cfg, &mut rng).unwrap();
    let baseline = random_weights(3, &mut rng);
    assert_eq!(learned.top(1), vec![1]);
    assert_eq!(baseline.ranks().len(), 3);
}

#[test]
fn surf_family_finds_the_cluster_feature() {
    let (data, target) = fixed_clusters(15);
    for neighborhood in [
        Neighborhood::Surf,
        Neighborhood::SurfStar,
        Neighborhood::MultiSurf,
        Neighborhood::MultiSurfStar,
    ] {
        let r = surf(&data, 3, &target, &manhattan, &SurfConfig::new(neighborhood)).unwrap();
        assert_eq!(r.ranks()[1], 1, "{neighborhood:?} {:?}", r.weights());
    }
}

#[test]
fn surf_in_mahalanobis_space() {
    let (data, target) = fixed_clusters(15);
    let space = Arc::new(ProjectedSpace::mahalanobis(&data, 3).unwrap());
    for neighborhood in [Neighborhood::Surf, Neighborhood::MultiSurf] {
        let cfg = SurfConfig::new(neighborhood).with_learned_metric(space.clone());
        let r = surf(&data, 3, &target, &euclidean, &cfg).unwrap();
        assert_eq!(r.ranks()[1], 1, "{neighborhood:?} {:?}", r.weights());
    }
}

#[test]
fn precomputed_matrix_matches_direct_distance() {
    let (data, target) = fixed_clusters(6);
    let matrix = pairwise_distances(&data, 3, &Distance::Paired(&euclidean)).unwrap();
    let cfg = ReliefConfig::new().with_learned_metric(Arc::new(matrix));
    let a = relief(&data, 3, &target, &euclidean, &cfg, &mut StdRng::seed_from_u64(4)).unwrap();
    let b = relief(
        &data,
        3,
        &target,
        &euclidean,
        &ReliefConfig::new(),
        &mut StdRng::seed_from_u64(4),
    )
    .unwrap();
    for (x, y) in a.weights().iter().zip(b.weights()) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-12);
    }
}
