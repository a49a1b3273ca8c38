pub mod codec;
pub mod dataset;

pub use codec::FeatureCodec;
pub use dataset::Dataset;
