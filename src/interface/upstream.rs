use crate::{RemoteBranch, RemoteRepository, StdResult};

/// A trait for querying repositories and branches from the upstream hosting API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UpstreamClient: Sync + Send {
    /// Lists the repositories owned by a user.
    ///
    /// Fails with a [`NotFoundError`](crate::NotFoundError) when the user does not exist.
    async fn list_repositories(&self, username: &str) -> StdResult<Vec<RemoteRepository>>;

    /// Lists the branches of a repository owned by a user.
    ///
    /// Fails with a [`NotFoundError`](crate::NotFoundError) when the repository does not exist.
    async fn list_branches(
        &self,
        username: &str,
        repository_name: &str,
    ) -> StdResult<Vec<RemoteBranch>>;
}
