mod aggregator_concurrent;
mod http_api;
mod upstream_github;

pub use aggregator_concurrent::*;
pub use http_api::*;
pub use upstream_github::*;
