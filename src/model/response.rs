use serde::{Deserialize, Serialize};

use super::{CombinedRepository, RemoteBranch};

/// A branch as exposed by the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BranchResponse {
    /// The name of the branch.
    pub name: String,

    /// The SHA of the last commit on the branch.
    pub last_commit_sha: String,
}

impl From<&RemoteBranch> for BranchResponse {
    fn from(branch: &RemoteBranch) -> Self {
        Self {
            name: branch.name().to_string(),
            last_commit_sha: branch.commit_sha().to_string(),
        }
    }
}

/// A repository with its branches as exposed by the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryResponse {
    /// The name of the repository.
    pub name: String,

    /// The login of the repository owner.
    pub owner_login: String,

    /// The branches of the repository.
    pub branches: Vec<BranchResponse>,
}

impl From<&CombinedRepository> for RepositoryResponse {
    fn from(repository: &CombinedRepository) -> Self {
        Self {
            name: repository.name().to_string(),
            owner_login: repository.owner_login().to_string(),
            branches: repository.branches().iter().map(Into::into).collect(),
        }
    }
}

/// The body returned by the HTTP API when a request fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureResponse {
    /// The HTTP status code.
    pub status: u16,

    /// A human readable description of the failure.
    pub message: String,
}

impl FailureResponse {
    /// Creates a new `FailureResponse` instance.
    pub fn new(status: u16, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn repository_response_serializes_with_camel_case_keys() {
        let response = RepositoryResponse::from(&CombinedRepository::dummy());

        assert_eq!(
            json!({
                "name": "repo1",
                "ownerLogin": "testuser",
                "branches": [
                    { "name": "branch1", "lastCommitSha": "commit sha" },
                    { "name": "branch2", "lastCommitSha": "commit sha" }
                ]
            }),
            serde_json::to_value(response).unwrap()
        );
    }

    #[test]
    fn failure_response_serializes_status_and_message() {
        let response = FailureResponse::new(404, "User with username ghost not found!");

        assert_eq!(
            json!({ "status": 404, "message": "User with username ghost not found!" }),
            serde_json::to_value(response).unwrap()
        );
    }
}
