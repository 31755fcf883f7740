use std::fmt::Display;

use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// The kind of upstream resource that could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A user, keyed by username.
    User,

    /// The branches of a repository, keyed by `username/repository`.
    Branch,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::User => write!(f, "user"),
            Resource::Branch => write!(f, "branch"),
        }
    }
}

/// The upstream API answered with a not-found status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NotFoundError {
    resource: Resource,
    key: String,
    message: String,
}

impl NotFoundError {
    /// Creates a not-found error for a missing user.
    pub fn user(username: &str) -> Self {
        Self {
            resource: Resource::User,
            key: username.to_string(),
            message: format!("User with username {username} not found!"),
        }
    }

    /// Creates a not-found error for the branches of a missing repository.
    pub fn branch(username: &str, repository_name: &str) -> Self {
        Self {
            resource: Resource::Branch,
            key: format!("{username}/{repository_name}"),
            message: format!(
                "Branch for username {username} and repository name {repository_name} not found!"
            ),
        }
    }

    /// Retrieves the kind of resource that was not found.
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Retrieves the key identifying the missing resource.
    pub fn key(&self) -> &str {
        &self.key
    }
}
