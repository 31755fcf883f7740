mod aggregator;
mod upstream;

pub use aggregator::*;
pub use upstream::*;
