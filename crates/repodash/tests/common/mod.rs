//! Scripted in-memory `RepositorySource` shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use repodash::platform::{self, ApiError, Page, RepositoryRecord, RepositorySource, UserProfile};

pub fn record(id: u64, full_name: &str) -> RepositoryRecord {
    let name = full_name
        .split_once('/')
        .map(|(_, name)| name)
        .unwrap_or(full_name);
    RepositoryRecord {
        id,
        name: name.to_string(),
        full_name: full_name.to_string(),
        description: None,
        html_url: format!("https://github.com/{full_name}"),
        clone_url: format!("https://github.com/{full_name}.git"),
        ssh_url: format!("git@github.com:{full_name}.git"),
        language: None,
        stargazers_count: 0,
        forks_count: 0,
        open_issues_count: 0,
        size: 0,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        pushed_at: None,
        private: false,
        fork: false,
        archived: false,
        disabled: false,
        is_owner: None,
    }
}

pub fn profile(login: &str, public_repos: u64) -> UserProfile {
    UserProfile {
        id: 7,
        login: login.to_string(),
        name: None,
        email: None,
        bio: None,
        avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
        public_repos,
        followers: 0,
        following: 0,
        created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// `count` records with ids `first_id..` owned by `owner`.
pub fn page_of(owner: &str, first_id: u64, count: u64) -> Page {
    (first_id..first_id + count)
        .map(|id| record(id, &format!("{owner}/repo{id}")))
        .collect()
}

/// Serves scripted pages; page `n` is `pages[n - 1]`, later pages are empty.
#[derive(Default)]
pub struct FakeSource {
    visible: Vec<Page>,
    owned: Vec<Page>,
    endless: bool,
    page_failure: Mutex<Option<(u32, ApiError)>>,
    user_failure: Option<ApiError>,
    delete_failure: Option<ApiError>,
    login: String,
    public_repos: u64,
    page_calls: Mutex<Vec<u32>>,
    user_calls: Mutex<Vec<String>>,
    deleted: Mutex<Vec<(String, String)>>,
}

impl FakeSource {
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            ..Default::default()
        }
    }

    pub fn with_visible_pages(mut self, pages: Vec<Page>) -> Self {
        self.visible = pages;
        self
    }

    pub fn with_owned_pages(mut self, pages: Vec<Page>) -> Self {
        self.owned = pages;
        self
    }

    /// Never return an empty page.
    pub fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    pub fn failing_on_page(self, page: u32, error: ApiError) -> Self {
        self.set_page_failure(page, error);
        self
    }

    /// Make `page` fail from now on, for sources already owned by a session.
    pub fn set_page_failure(&self, page: u32, error: ApiError) {
        *self.page_failure.lock().unwrap() = Some((page, error));
    }

    pub fn failing_user(mut self, error: ApiError) -> Self {
        self.user_failure = Some(error);
        self
    }

    pub fn failing_delete(mut self, error: ApiError) -> Self {
        self.delete_failure = Some(error);
        self
    }

    pub fn with_public_repos(mut self, public_repos: u64) -> Self {
        self.public_repos = public_repos;
        self
    }

    /// Page numbers requested so far, across both listings.
    pub fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn user_calls(&self) -> Vec<String> {
        self.user_calls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }

    fn serve(&self, pages: &[Page], page: u32, per_page: u32) -> platform::Result<Page> {
        self.page_calls.lock().unwrap().push(page);

        if let Some((failing, error)) = self.page_failure.lock().unwrap().as_ref()
            && *failing == page
        {
            return Err(error.clone());
        }
        if self.endless {
            let first = u64::from((page - 1) * per_page) + 1;
            return Ok(page_of("alice", first, u64::from(per_page)));
        }
        Ok(pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn fetch_user(&self, username: &str) -> platform::Result<UserProfile> {
        self.user_calls.lock().unwrap().push(username.to_string());
        match &self.user_failure {
            Some(error) => Err(error.clone()),
            None => Ok(profile(username, self.public_repos)),
        }
    }

    async fn fetch_authenticated_user(&self) -> platform::Result<UserProfile> {
        match &self.user_failure {
            Some(error) => Err(error.clone()),
            None => Ok(profile(&self.login, self.public_repos)),
        }
    }

    async fn fetch_repositories_page(
        &self,
        _username: &str,
        page: u32,
        per_page: u32,
    ) -> platform::Result<Page> {
        self.serve(&self.owned, page, per_page)
    }

    async fn fetch_visible_repositories_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> platform::Result<Page> {
        self.serve(&self.visible, page, per_page)
    }

    async fn fetch_repository(&self, owner: &str, name: &str) -> platform::Result<RepositoryRecord> {
        let full_name = format!("{owner}/{name}");
        self.visible
            .iter()
            .flatten()
            .find(|repo| repo.full_name == full_name)
            .cloned()
            .ok_or_else(|| ApiError::new(404, "Failed to fetch repository: Not Found"))
    }

    async fn delete_repository(&self, owner: &str, name: &str) -> platform::Result<()> {
        if let Some(error) = &self.delete_failure {
            return Err(error.clone());
        }
        self.deleted
            .lock()
            .unwrap()
            .push((owner.to_string(), name.to_string()));
        Ok(())
    }
}
