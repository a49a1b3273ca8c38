use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Running average of the per-sample MSE seen during this epoch, each
    /// measured just before that sample's update.
    pub train_loss: f64,
    pub elapsed_ms: u64,
}
