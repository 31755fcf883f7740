use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};

use crate::{
    CombinedRepository, RemoteBranch, RemoteRepository, RepositoryAggregator, StdResult,
    UpstreamClient,
};

/// An aggregator that fetches the branches of every non-fork repository concurrently.
pub struct ConcurrentAggregator {
    /// The upstream client
    upstream: Arc<dyn UpstreamClient>,
}

impl ConcurrentAggregator {
    /// Creates a new `ConcurrentAggregator` instance with the given upstream client.
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream }
    }

    /// Fetches the branches of a repository, substituting an empty list on any failure.
    async fn fetch_branches_or_empty(
        &self,
        username: &str,
        repository: &RemoteRepository,
    ) -> Vec<RemoteBranch> {
        match self.upstream.list_branches(username, repository.name()).await {
            Ok(branches) => branches,
            Err(e) => {
                warn!("Failed to fetch branches of {repository}, using none: {e}");
                vec![]
            }
        }
    }
}

#[async_trait::async_trait]
impl RepositoryAggregator for ConcurrentAggregator {
    async fn get_repositories(&self, username: &str) -> StdResult<Vec<CombinedRepository>> {
        let repositories = self.upstream.list_repositories(username).await?;
        debug!(
            "Fetched {} repositories for user {username}",
            repositories.len()
        );

        let units = repositories
            .into_iter()
            .filter(|repository| !repository.is_fork())
            .map(|repository| async move {
                let branches = self.fetch_branches_or_empty(username, &repository).await;
                CombinedRepository::combine(repository, branches)
            });

        Ok(join_all(units).await)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use anyhow::anyhow;
    use mockall::predicate::eq;
    use tokio::time::sleep;

    use crate::{MockUpstreamClient, NotFoundError, Resource};

    use super::*;

    const USERNAME: &str = "testuser";

    fn upstream_repositories() -> Vec<RemoteRepository> {
        vec![
            RemoteRepository::new("repo1", false, USERNAME),
            RemoteRepository::new("repo2", false, USERNAME),
            RemoteRepository::new("repo3", true, USERNAME),
        ]
    }

    fn upstream_branches() -> Vec<RemoteBranch> {
        vec![
            RemoteBranch::new("branch1", "commit sha"),
            RemoteBranch::new("branch2", "commit sha"),
        ]
    }

    #[tokio::test]
    async fn get_repositories_combines_non_fork_repositories_with_their_branches() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .with(eq(USERNAME))
                .returning(|_| Ok(upstream_repositories()))
                .times(1);
            upstream
                .expect_list_branches()
                .with(eq(USERNAME), eq("repo1"))
                .returning(|_, _| Ok(upstream_branches()))
                .times(1);
            upstream
                .expect_list_branches()
                .with(eq(USERNAME), eq("repo2"))
                .returning(|_, _| Ok(upstream_branches()))
                .times(1);

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let repositories = aggregator.get_repositories(USERNAME).await.unwrap();

        assert_eq!(
            vec![
                CombinedRepository::combine(
                    RemoteRepository::new("repo1", false, USERNAME),
                    upstream_branches()
                ),
                CombinedRepository::combine(
                    RemoteRepository::new("repo2", false, USERNAME),
                    upstream_branches()
                ),
            ],
            repositories
        );
    }

    #[tokio::test]
    async fn get_repositories_returns_empty_without_branch_calls_when_user_has_no_repositories() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .returning(|_| Ok(vec![]))
                .times(1);
            upstream.expect_list_branches().never();

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let repositories = aggregator.get_repositories(USERNAME).await.unwrap();

        assert!(repositories.is_empty());
    }

    #[tokio::test]
    async fn get_repositories_skips_branch_calls_for_forks() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .returning(|_| Ok(vec![RemoteRepository::new("repo3", true, USERNAME)]))
                .times(1);
            upstream.expect_list_branches().never();

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let repositories = aggregator.get_repositories(USERNAME).await.unwrap();

        assert!(repositories.is_empty());
    }

    #[tokio::test]
    async fn get_repositories_substitutes_empty_branches_when_branch_fetch_fails() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .returning(|_| Ok(upstream_repositories()))
                .times(1);
            upstream
                .expect_list_branches()
                .with(eq(USERNAME), eq("repo1"))
                .returning(|username, repository_name| {
                    Err(NotFoundError::branch(username, repository_name).into())
                })
                .times(1);
            upstream
                .expect_list_branches()
                .with(eq(USERNAME), eq("repo2"))
                .returning(|_, _| Err(anyhow!("Connection reset by peer")))
                .times(1);

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let repositories = aggregator.get_repositories(USERNAME).await.unwrap();

        assert_eq!(
            vec![
                CombinedRepository::combine(
                    RemoteRepository::new("repo1", false, USERNAME),
                    vec![]
                ),
                CombinedRepository::combine(
                    RemoteRepository::new("repo2", false, USERNAME),
                    vec![]
                ),
            ],
            repositories
        );
    }

    #[tokio::test]
    async fn get_repositories_keeps_siblings_when_one_branch_fetch_fails() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .returning(|_| Ok(upstream_repositories()))
                .times(1);
            upstream
                .expect_list_branches()
                .with(eq(USERNAME), eq("repo1"))
                .returning(|_, _| Err(anyhow!("Service unavailable")))
                .times(1);
            upstream
                .expect_list_branches()
                .with(eq(USERNAME), eq("repo2"))
                .returning(|_, _| Ok(upstream_branches()))
                .times(1);

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let repositories = aggregator.get_repositories(USERNAME).await.unwrap();

        assert_eq!(2, repositories.len());
        assert!(repositories[0].branches().is_empty());
        assert_eq!(upstream_branches(), repositories[1].branches());
    }

    #[tokio::test]
    async fn get_repositories_fails_with_not_found_when_user_is_missing() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .with(eq("ghost"))
                .returning(|username| Err(NotFoundError::user(username).into()))
                .times(1);
            upstream.expect_list_branches().never();

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let error = aggregator
            .get_repositories("ghost")
            .await
            .expect_err("Expected a not found error");

        let not_found = error.downcast_ref::<NotFoundError>().unwrap();
        assert_eq!(Resource::User, not_found.resource());
        assert_eq!("ghost", not_found.key());
    }

    #[tokio::test]
    async fn get_repositories_propagates_repository_listing_failure() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .returning(|_| Err(anyhow!("Bad gateway")))
                .times(1);
            upstream.expect_list_branches().never();

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let error = aggregator
            .get_repositories(USERNAME)
            .await
            .expect_err("Expected an upstream error");

        assert_eq!("Bad gateway", error.to_string());
    }

    #[tokio::test]
    async fn get_repositories_is_idempotent_against_unchanged_upstream() {
        let upstream = {
            let mut upstream = MockUpstreamClient::new();
            upstream
                .expect_list_repositories()
                .returning(|_| Ok(upstream_repositories()))
                .times(2);
            upstream
                .expect_list_branches()
                .returning(|_, _| Ok(upstream_branches()))
                .times(4);

            upstream
        };
        let aggregator = ConcurrentAggregator::new(Arc::new(upstream));

        let first = aggregator.get_repositories(USERNAME).await.unwrap();
        let second = aggregator.get_repositories(USERNAME).await.unwrap();

        assert_eq!(first, second);
    }

    /// An upstream client whose branch calls take a fixed time to answer.
    struct SlowUpstreamClient {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl UpstreamClient for SlowUpstreamClient {
        async fn list_repositories(&self, username: &str) -> StdResult<Vec<RemoteRepository>> {
            Ok((0..10)
                .map(|i| RemoteRepository::new(&format!("repo{i}"), false, username))
                .collect())
        }

        async fn list_branches(
            &self,
            _username: &str,
            _repository_name: &str,
        ) -> StdResult<Vec<RemoteBranch>> {
            sleep(self.delay).await;
            Ok(upstream_branches())
        }
    }

    #[tokio::test]
    async fn get_repositories_fetches_branches_concurrently() {
        let delay = Duration::from_millis(200);
        let aggregator = ConcurrentAggregator::new(Arc::new(SlowUpstreamClient { delay }));
        let started_at = Instant::now();

        let repositories = aggregator.get_repositories(USERNAME).await.unwrap();

        assert_eq!(10, repositories.len());
        assert!(started_at.elapsed() < delay * 5);
    }
}
