use std::sync::mpsc;

use crate::error::{NnError, Result};
use crate::train::epoch_stats::EpochStats;

/// Log a progress line every this many epochs unless told otherwise.
pub const DEFAULT_REPORT_EVERY: usize = 100;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`:        total number of full passes over the training data
/// - `learning_rate`: step size of every per-sample update
/// - `report_every`:  epoch interval for `info!` progress lines; `0` silences them
/// - `progress_tx`:   optional channel sender; one `EpochStats` is sent per
///                     completed epoch. A dropped receiver is ignored, the
///                     loop always runs every requested epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default report interval and no progress channel.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            report_every: DEFAULT_REPORT_EVERY,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_report_every(mut self, report_every: usize) -> Self {
        self.report_every = report_every;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NnError::InvalidHyperparameter("epochs must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NnError::InvalidHyperparameter(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_epochs_and_bad_rates() {
        assert!(TrainConfig::new(0, 0.01).validate().is_err());
        assert!(TrainConfig::new(10, 0.0).validate().is_err());
        assert!(TrainConfig::new(10, -1.0).validate().is_err());
        assert!(TrainConfig::new(10, f64::NAN).validate().is_err());
        assert!(TrainConfig::new(10, 0.01).validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let (tx, _rx) = mpsc::channel();
        let config = TrainConfig::new(5, 0.1).with_report_every(0).with_progress(tx);
        assert_eq!(config.report_every, 0);
        assert!(config.progress_tx.is_some());
    }
}
