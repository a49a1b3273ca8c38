use std::time::Instant;

use log::info;

use crate::error::{ensure_width, NnError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for exactly `config.epochs` epochs of online updates and
/// returns the mean training loss of the last epoch.
///
/// Samples are visited in the order given, no shuffling. Each sample gets a
/// forward pass (its loss is accumulated) followed by one backpropagation
/// step, so an update is visible to the very next sample.
///
/// # Errors
/// - `InvalidHyperparameter` for zero epochs, a non-positive learning rate or
///   an empty training set
/// - `DimensionMismatch` if sample and target counts differ or any vector
///   does not fit the network
pub fn train_loop(
    network: &mut Network,
    samples: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    config.validate()?;
    let optimizer = Sgd::new(config.learning_rate)?;
    check_training_set(network, samples, targets)?;

    info!(
        "training {:?} on {} samples: {} epochs, lr={}",
        network.architecture(),
        samples.len(),
        config.epochs,
        config.learning_rate
    );

    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let train_loss = run_one_epoch(network, samples, targets, &optimizer)?;
        last_train_loss = train_loss;

        if config.report_every > 0 && epoch % config.report_every == 0 {
            info!("epoch {epoch}/{} - loss: {train_loss:.4}", config.epochs);
        }

        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                train_loss,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            // Nobody listening is fine; reporting never shortens a run.
            let _ = tx.send(stats);
        }
    }

    info!("training finished, last epoch loss {last_train_loss:.4}");
    Ok(last_train_loss)
}

/// Mean MSE over a dataset without touching the weights.
pub fn evaluate_loss(
    network: &mut Network,
    samples: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> Result<f64> {
    ensure_width("targets", targets.len(), samples.len())?;
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for (sample, target) in samples.iter().zip(targets) {
        let predicted = network.forward(sample)?;
        total += MseLoss::loss(&predicted, target)?;
    }
    Ok(total / samples.len() as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_training_set(network: &Network, samples: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if samples.is_empty() {
        return Err(NnError::InvalidHyperparameter("training set must not be empty".into()));
    }
    ensure_width("targets", targets.len(), samples.len())?;
    for (sample, target) in samples.iter().zip(targets) {
        ensure_width("sample", sample.len(), network.input_size())?;
        ensure_width("target", target.len(), network.output_size())?;
    }
    Ok(())
}

/// One pass over the data, one update per sample.
fn run_one_epoch(
    network: &mut Network,
    samples: &[Vec<f64>],
    targets: &[Vec<f64>],
    optimizer: &Sgd,
) -> Result<f64> {
    let mut total_loss = 0.0;
    for (sample, target) in samples.iter().zip(targets) {
        let predicted = network.forward(sample)?;
        network.backpropagate_with(sample, target, optimizer)?;
        total_loss += MseLoss::loss(&predicted, target)?;
    }
    Ok(total_loss / samples.len() as f64)
}
