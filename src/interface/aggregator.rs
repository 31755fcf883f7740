use crate::{CombinedRepository, StdResult};

/// A trait for retrieving the non-fork repositories of a user along with their branches.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryAggregator: Sync + Send {
    /// Retrieves the non-fork repositories of a user with their branches.
    async fn get_repositories(&self, username: &str) -> StdResult<Vec<CombinedRepository>>;
}
