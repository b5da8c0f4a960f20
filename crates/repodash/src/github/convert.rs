//! Model conversion from GitHub API types to repodash records.

use super::types::{GitHubRepo, GitHubUser};
use crate::platform::{RepositoryRecord, UserProfile};

/// Convert a GitHub user payload to a profile.
pub fn to_user_profile(user: GitHubUser) -> UserProfile {
    UserProfile {
        id: user.id,
        login: user.login,
        name: user.name,
        email: user.email,
        bio: user.bio,
        avatar_url: user.avatar_url,
        public_repos: user.public_repos,
        followers: user.followers,
        following: user.following,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// Convert a GitHub repository payload to an untagged record.
pub fn to_repository_record(repo: GitHubRepo) -> RepositoryRecord {
    RepositoryRecord {
        id: repo.id,
        name: repo.name,
        full_name: repo.full_name,
        description: repo.description,
        html_url: repo.html_url,
        clone_url: repo.clone_url,
        ssh_url: repo.ssh_url,
        language: repo.language,
        stargazers_count: repo.stargazers_count,
        forks_count: repo.forks_count,
        open_issues_count: repo.open_issues_count,
        size: repo.size,
        created_at: repo.created_at,
        updated_at: repo.updated_at,
        pushed_at: repo.pushed_at,
        private: repo.private,
        fork: repo.fork,
        archived: repo.archived,
        disabled: repo.disabled,
        is_owner: None,
    }
}
