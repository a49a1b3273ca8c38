pub mod dense;
pub mod unit;

pub use dense::Layer;
pub use unit::Unit;
