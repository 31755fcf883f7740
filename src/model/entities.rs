use std::{fmt::Display, ops::Deref};

/// The name of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(pub String);

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The login of the account owning a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerLogin(pub String);

impl Deref for OwnerLogin {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for OwnerLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(pub String);

impl Deref for BranchName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The SHA of the commit a branch points to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(pub String);

impl Deref for CommitSha {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for CommitSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository as listed by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    /// The name of the repository.
    name: RepositoryName,

    /// Whether the repository is a fork of another repository.
    is_fork: bool,

    /// The login of the repository owner.
    owner_login: OwnerLogin,
}

impl RemoteRepository {
    /// Creates a new `RemoteRepository` instance.
    pub fn new(name: &str, is_fork: bool, owner_login: &str) -> Self {
        Self {
            name: RepositoryName(name.to_string()),
            is_fork,
            owner_login: OwnerLogin(owner_login.to_string()),
        }
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Returns `true` if the repository is a fork.
    pub fn is_fork(&self) -> bool {
        self.is_fork
    }

    /// Retrieves the login of the repository owner.
    pub fn owner_login(&self) -> &OwnerLogin {
        &self.owner_login
    }
}

impl Display for RemoteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Owner: {}, Fork: {}",
            self.name, self.owner_login, self.is_fork
        )
    }
}

/// A branch as listed by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    /// The name of the branch.
    name: BranchName,

    /// The SHA of the last commit on the branch.
    commit_sha: CommitSha,
}

impl RemoteBranch {
    /// Creates a new `RemoteBranch` instance.
    pub fn new(name: &str, commit_sha: &str) -> Self {
        Self {
            name: BranchName(name.to_string()),
            commit_sha: CommitSha(commit_sha.to_string()),
        }
    }

    /// Retrieves the branch name.
    pub fn name(&self) -> &BranchName {
        &self.name
    }

    /// Retrieves the SHA of the last commit on the branch.
    pub fn commit_sha(&self) -> &CommitSha {
        &self.commit_sha
    }
}

/// A non-fork repository together with its branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRepository {
    /// The name of the repository.
    name: RepositoryName,

    /// The login of the repository owner.
    owner_login: OwnerLogin,

    /// The branches of the repository, empty when they could not be fetched.
    branches: Vec<RemoteBranch>,
}

impl CombinedRepository {
    /// Combines a repository with the outcome of its branch fetch.
    pub fn combine(repository: RemoteRepository, branches: Vec<RemoteBranch>) -> Self {
        Self {
            name: repository.name,
            owner_login: repository.owner_login,
            branches,
        }
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Retrieves the login of the repository owner.
    pub fn owner_login(&self) -> &OwnerLogin {
        &self.owner_login
    }

    /// Retrieves the branches of the repository.
    pub fn branches(&self) -> &[RemoteBranch] {
        &self.branches
    }

    /// Creates a dummy `CombinedRepository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::combine(
            RemoteRepository::new("repo1", false, "testuser"),
            vec![
                RemoteBranch::new("branch1", "commit sha"),
                RemoteBranch::new("branch2", "commit sha"),
            ],
        )
    }
}

impl Display for CombinedRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Owner: {}, Branches: {}",
            self.name,
            self.owner_login,
            self.branches.len()
        )
    }
}
