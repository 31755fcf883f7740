//! Lists the non-fork repositories of a GitHub user along with their branches.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
