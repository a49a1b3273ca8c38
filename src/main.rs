// Trains the Iris classifier end to end.
// Usage:
//   iris-nn [config.json]
// Without a config file the defaults in `RunConfig::default()` are used.
use anyhow::Context;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use iris_nn::{
    metrics::{accuracy, predicted_classes},
    Dataset, FeatureCodec, Network, RunConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            RunConfig::load_json(&path).with_context(|| format!("reading config {path}"))?
        }
        None => RunConfig::default(),
    };

    let dataset = Dataset::from_csv_path(
        &config.data_path,
        &config.label_column,
        config.id_column.as_deref(),
    )
    .with_context(|| format!("loading {}", config.data_path))?;
    info!(
        "dataset: {} samples, {} features, {} classes",
        dataset.len(),
        dataset.feature_names.len(),
        dataset.num_classes()
    );
    let (train, test) = dataset.stratified_split(config.test_fraction, config.split_seed)?;

    let mut codec = FeatureCodec::new();
    let x_train = codec.fit_normalize(&train.features)?;
    let x_test = codec.apply_normalize(&test.features)?;
    let y_train = codec.fit_encode(&train.labels)?;
    let y_test = codec
        .apply_encode(&test.labels)
        .context("test partition holds a class missing from training")?;
    let targets = FeatureCodec::one_hot(&y_train, codec.num_classes())?;

    let mut rng = match config.init_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = Network::new(&config.architecture, &mut rng)?
        .with_error_propagation(config.error_propagation);

    iris_nn::train_loop(&mut network, &x_train, &targets, &config.train_config())?;

    let train_predictions = network.predict_batch(&x_train)?;
    let test_predictions = network.predict_batch(&x_test)?;
    let train_acc = accuracy(&train_predictions, &y_train)?;
    let test_acc = accuracy(&test_predictions, &y_test)?;

    println!("Train accuracy: {train_acc:.2}%");
    println!("Test accuracy:  {test_acc:.2}%");
    let gap = (train_acc - test_acc).abs();
    if gap < 10.0 {
        println!("Generalizes (gap {gap:.1}%)");
    } else {
        println!("Possible overfitting (gap {gap:.1}%)");
    }

    let predicted = codec.decode(&predicted_classes(&test_predictions))?;
    println!("\n{:<20} {:<20} Confidence", "Actual", "Predicted");
    let rows = test.labels.iter().zip(&predicted).zip(&test_predictions);
    for ((actual, guess), probs) in rows.take(10) {
        let confidence = probs.iter().cloned().fold(f64::MIN, f64::max) * 100.0;
        let mark = if actual == guess { "ok" } else { "miss" };
        println!("{actual:<20} {guess:<20} {confidence:>5.1}% {mark}");
    }

    if let Some(path) = &config.model_out {
        network.save_json(path).with_context(|| format!("saving model to {path}"))?;
        info!("model saved to {path}");
    }

    Ok(())
}
