use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::network::ErrorPropagation;
use crate::train::train_config::{TrainConfig, DEFAULT_REPORT_EVERY};

/// Everything the `iris-nn` binary needs for one run.
///
/// Stored as JSON; every field is optional in the file and falls back to the
/// values of `RunConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_path: String,
    pub label_column: String,
    /// Identifier column dropped before training, if the file has one.
    pub id_column: Option<String>,
    /// Layer widths, input first.
    pub architecture: Vec<usize>,
    pub epochs: usize,
    pub learning_rate: f64,
    pub test_fraction: f64,
    pub split_seed: u64,
    /// `None` draws initial weights from OS entropy.
    pub init_seed: Option<u64>,
    pub report_every: usize,
    pub error_propagation: ErrorPropagation,
    /// Where to write the trained network, if anywhere.
    pub model_out: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data_path: "data/Iris.csv".into(),
            label_column: "Species".into(),
            id_column: Some("Id".into()),
            architecture: vec![4, 8, 3],
            epochs: 1000,
            learning_rate: 0.01,
            test_fraction: 0.2,
            split_seed: 42,
            init_seed: None,
            report_every: DEFAULT_REPORT_EVERY,
            error_propagation: ErrorPropagation::default(),
            model_out: None,
        }
    }
}

impl RunConfig {
    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.learning_rate).with_report_every(self.report_every)
    }
}
