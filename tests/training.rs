use rand::{rngs::StdRng, SeedableRng};

use iris_nn::{
    math::init::sample_standard_normal,
    metrics::accuracy,
    train::evaluate_loss,
    ErrorPropagation, FeatureCodec, Network,
};

/// Three well separated 4-D clusters, classes interleaved row by row.
fn clusters(per_class: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>) {
    let centers = [
        [0.2, 0.7, 0.1, 0.1],
        [0.5, 0.3, 0.55, 0.5],
        [0.7, 0.45, 0.8, 0.85],
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Vec::new();
    let mut codes = Vec::new();
    for _ in 0..per_class {
        for (class, center) in centers.iter().enumerate() {
            let row = center
                .iter()
                .map(|c| (c + 0.05 * sample_standard_normal(&mut rng)).clamp(0.0, 1.0))
                .collect();
            features.push(row);
            codes.push(class);
        }
    }
    (features, codes)
}

#[test]
fn separable_toy_set_converges() {
    let samples = vec![vec![0.0], vec![0.1], vec![0.2], vec![0.8], vec![0.9], vec![1.0]];
    let targets = FeatureCodec::one_hot(&[0, 0, 0, 1, 1, 1], 2).unwrap();
    let mut net = Network::seeded(&[1, 2], 1).unwrap();

    let initial = evaluate_loss(&mut net, &samples, &targets).unwrap();
    net.train(&samples, &targets, 3000, 1.0).unwrap();
    let trained = evaluate_loss(&mut net, &samples, &targets).unwrap();

    assert!(trained < initial);
    assert!(trained < 0.05, "toy loss stayed at {trained}");
}

#[test]
fn iris_shaped_run_beats_untrained_weights() {
    let (features, codes) = clusters(40, 5);
    assert_eq!(features.len(), 120);
    let targets = FeatureCodec::one_hot(&codes, 3).unwrap();
    let mut net = Network::seeded(&[4, 8, 3], 42).unwrap();

    let initial = evaluate_loss(&mut net, &features, &targets).unwrap();
    let last_epoch = net.train(&features, &targets, 1000, 0.01).unwrap();
    let trained = evaluate_loss(&mut net, &features, &targets).unwrap();

    assert!(last_epoch < initial, "{last_epoch} >= {initial}");
    assert!(trained < initial, "{trained} >= {initial}");

    let predictions = net.predict_batch(&features).unwrap();
    assert!(accuracy(&predictions, &codes).unwrap() > 70.0);
}

#[test]
fn seeded_runs_are_bit_identical() {
    let (features, codes) = clusters(5, 3);
    let targets = FeatureCodec::one_hot(&codes, 3).unwrap();
    let run = || {
        let mut net = Network::seeded(&[4, 8, 3], 99).unwrap();
        let loss = net.train(&features, &targets, 20, 0.1).unwrap();
        (loss, net.layers().to_vec())
    };
    assert_eq!(run(), run());
}

#[test]
fn both_propagation_modes_learn() {
    let (features, codes) = clusters(10, 11);
    let targets = FeatureCodec::one_hot(&codes, 3).unwrap();
    for mode in [ErrorPropagation::UpdatedWeights, ErrorPropagation::PreUpdateWeights] {
        let mut net = Network::seeded(&[4, 6, 3], 2).unwrap().with_error_propagation(mode);
        let initial = evaluate_loss(&mut net, &features, &targets).unwrap();
        net.train(&features, &targets, 300, 0.5).unwrap();
        let trained = evaluate_loss(&mut net, &features, &targets).unwrap();
        assert!(trained < initial, "{mode:?}: {trained} >= {initial}");
    }
}

#[test]
fn modes_diverge_once_hidden_layers_update() {
    let (features, codes) = clusters(3, 4);
    let targets = FeatureCodec::one_hot(&codes, 3).unwrap();
    let mut in_place = Network::seeded(&[4, 5, 3], 6).unwrap();
    let mut classical = in_place.clone().with_error_propagation(ErrorPropagation::PreUpdateWeights);
    in_place.train(&features, &targets, 5, 0.5).unwrap();
    classical.train(&features, &targets, 5, 0.5).unwrap();
    assert_ne!(in_place.layers()[0], classical.layers()[0]);
}
