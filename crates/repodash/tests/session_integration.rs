//! Integration tests for the dashboard session.
//!
//! Key scenarios tested:
//! - Loading fetches profile and repositories together
//! - A failed refresh keeps the previous state
//! - Deleting reconciles the local list and the profile count
//! - A failed delete leaves local state untouched
//! - Token validation rejects a mismatched account

mod common;

use common::{FakeSource, page_of, record};
use repodash::platform::ApiError;
use repodash::session::{Identity, Session, SessionError};

fn identity(username: &str) -> Identity {
    Identity::new("ghp_integration", username).expect("identity should build")
}

#[tokio::test]
async fn test_load_fills_profile_and_repositories() {
    let source = FakeSource::new("alice")
        .with_public_repos(10)
        .with_visible_pages(vec![page_of("alice", 1, 10)]);
    let mut session = Session::new(identity("alice"), source);

    session.load().await.expect("load should succeed");

    assert_eq!(session.repositories().len(), 10);
    assert_eq!(session.profile().map(|p| p.public_repos), Some(10));
    assert_eq!(session.source().user_calls(), vec!["alice".to_string()]);
    assert!(session.repositories().iter().all(|r| r.is_owner == Some(true)));
}

#[tokio::test]
async fn test_delete_reconciles_local_state() {
    let source = FakeSource::new("alice")
        .with_public_repos(10)
        .with_visible_pages(vec![page_of("alice", 1, 10)]);
    let mut session = Session::new(identity("alice"), source);
    session.load().await.expect("load should succeed");

    let repo5 = session
        .find_by_full_name("alice/repo5")
        .map(|r| r.id)
        .expect("repo5 is loaded");
    let removed = session
        .delete_repository(repo5)
        .await
        .expect("delete should succeed");

    assert_eq!(removed.full_name, "alice/repo5");
    assert_eq!(session.repositories().len(), 9);
    assert!(session.find_repository(repo5).is_none());
    assert_eq!(session.profile().map(|p| p.public_repos), Some(9));
    assert_eq!(
        session.source().deleted(),
        vec![("alice".to_string(), "repo5".to_string())]
    );
}

#[tokio::test]
async fn test_failed_delete_keeps_local_state() {
    let source = FakeSource::new("alice")
        .with_public_repos(3)
        .with_visible_pages(vec![page_of("alice", 1, 3)])
        .failing_delete(ApiError::new(
            403,
            "Failed to delete repository: Must have admin rights to Repository.",
        ));
    let mut session = Session::new(identity("alice"), source);
    session.load().await.expect("load should succeed");

    let err = session
        .delete_repository(2)
        .await
        .expect_err("delete should fail");

    assert_eq!(err.status(), Some(403));
    assert_eq!(session.repositories().len(), 3);
    assert_eq!(session.profile().map(|p| p.public_repos), Some(3));
}

#[tokio::test]
async fn test_delete_uses_owner_segment_of_contributed_repo() {
    let source = FakeSource::new("alice")
        .with_public_repos(1)
        .with_visible_pages(vec![vec![record(1, "alice/one"), record(2, "acme/tool")]]);
    let mut session = Session::new(identity("alice"), source);
    session.load().await.expect("load should succeed");

    session
        .delete_repository(2)
        .await
        .expect("delete should succeed");

    assert_eq!(
        session.source().deleted(),
        vec![("acme".to_string(), "tool".to_string())]
    );
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_state() {
    let source = FakeSource::new("alice")
        .with_public_repos(2)
        .with_visible_pages(vec![page_of("alice", 1, 2)]);
    let mut session = Session::new(identity("alice"), source);
    session.load().await.expect("load should succeed");
    session.remove_repository(1);

    session.source().set_page_failure(
        1,
        ApiError::new(502, "Failed to fetch contributed repositories: Bad Gateway"),
    );
    let err = session.refresh().await.expect_err("refresh should fail");

    assert!(matches!(err, SessionError::Aggregation(_)));
    assert_eq!(err.status(), Some(502));
    assert_eq!(session.repositories().len(), 1);
    assert_eq!(session.repositories()[0].id, 2);
    assert_eq!(session.profile().map(|p| p.public_repos), Some(1));
}

#[tokio::test]
async fn test_profile_failure_fails_load() {
    let source = FakeSource::new("ghost")
        .with_visible_pages(vec![page_of("ghost", 1, 2)])
        .failing_user(ApiError::new(404, "Failed to fetch user: Not Found"));
    let mut session = Session::new(identity("ghost"), source);

    let err = session.load().await.expect_err("profile fetch fails");

    assert_eq!(err.to_string(), "Failed to fetch user: Not Found");
    assert!(session.profile().is_none());
    assert!(session.repositories().is_empty());
}

#[tokio::test]
async fn test_validate_rejects_token_of_other_account() {
    let session = Session::new(identity("alice"), FakeSource::new("mallory"));

    let err = session.validate().await.expect_err("accounts differ");

    assert_eq!(
        err,
        SessionError::OwnershipMismatch {
            claimed: "alice".to_string(),
            actual: "mallory".to_string(),
        }
    );
}

#[tokio::test]
async fn test_validate_surfaces_bad_credentials() {
    let source = FakeSource::new("alice").failing_user(ApiError::new(
        401,
        "Failed to fetch authenticated user: Bad credentials",
    ));
    let session = Session::new(identity("alice"), source);

    let err = session.validate().await.expect_err("token rejected");
    assert!(matches!(err, SessionError::Api(ref e) if e.is_unauthorized()));
}

#[tokio::test]
async fn test_fetch_repository_detail() {
    let source = FakeSource::new("alice").with_visible_pages(vec![vec![record(4, "alice/four")]]);
    let session = Session::new(identity("alice"), source);

    let repo = session
        .fetch_repository("alice", "four")
        .await
        .expect("repository exists");
    assert_eq!(repo.id, 4);

    let err = session
        .fetch_repository("alice", "missing")
        .await
        .expect_err("repository is missing");
    assert_eq!(err.status(), Some(404));
}
