use anyhow::anyhow;
use log::debug;
use reqwest::{
    Client, StatusCode, Url,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{NotFoundError, RemoteBranch, RemoteRepository, StdResult, UpstreamClient};

/// The REST production endpoint for GitHub.
pub const GITHUB_API_ENDPOINT: &str = "https://api.github.com";

/// The GitHub REST API version requested by default.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

const GITHUB_API_VERSION_HEADER: &str = "x-github-api-version";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize, Debug)]
struct RepositoryRecord {
    name: String,
    fork: bool,
    owner: OwnerRecord,
}

#[derive(Deserialize, Debug)]
struct OwnerRecord {
    login: String,
}

#[derive(Deserialize, Debug)]
struct BranchRecord {
    name: String,
    commit: CommitRecord,
}

#[derive(Deserialize, Debug)]
struct CommitRecord {
    sha: String,
}

impl From<RepositoryRecord> for RemoteRepository {
    fn from(record: RepositoryRecord) -> Self {
        RemoteRepository::new(&record.name, record.fork, &record.owner.login)
    }
}

impl From<BranchRecord> for RemoteBranch {
    fn from(record: BranchRecord) -> Self {
        RemoteBranch::new(&record.name, &record.commit.sha)
    }
}

/// Fetches repositories and branches from the GitHub REST API.
#[derive(Debug)]
pub struct GitHubRestClient {
    client: Client,
    base_url: Url,
}

impl GitHubRestClient {
    /// Creates a new `GitHubRestClient` for the given base URL and API version.
    pub fn try_new(base_url: &str, api_version: &str) -> StdResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid GitHub API base URL: {base_url}"));
        }
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(GITHUB_API_VERSION_HEADER),
            HeaderValue::from_str(api_version)?,
        );
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> StdResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid GitHub API base URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_records<T: DeserializeOwned>(
        &self,
        url: Url,
        not_found: NotFoundError,
    ) -> StdResult<Vec<T>> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found.into());
        }

        Ok(response.error_for_status()?.json::<Vec<T>>().await?)
    }
}

#[async_trait::async_trait]
impl UpstreamClient for GitHubRestClient {
    async fn list_repositories(&self, username: &str) -> StdResult<Vec<RemoteRepository>> {
        let url = self.endpoint(&["users", username, "repos"])?;
        let records = self
            .get_records::<RepositoryRecord>(url, NotFoundError::user(username))
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn list_branches(
        &self,
        username: &str,
        repository_name: &str,
    ) -> StdResult<Vec<RemoteBranch>> {
        let url = self.endpoint(&["repos", username, repository_name, "branches"])?;
        let records = self
            .get_records::<BranchRecord>(url, NotFoundError::branch(username, repository_name))
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
