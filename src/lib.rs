pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod metrics;
pub mod config;

// Convenience re-exports
pub use error::{NnError, Result};
pub use layers::{Layer, Unit};
pub use network::{ErrorPropagation, Network};
pub use loss::MseLoss;
pub use optim::Sgd;
pub use train::{train_loop, EpochStats, TrainConfig};
pub use data::{Dataset, FeatureCodec};
pub use config::RunConfig;
