pub mod network;

pub use network::{ErrorPropagation, Network};
