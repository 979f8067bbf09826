//! Unit tests for the rotation coordinator

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::token::SessionTokenRecord;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryTokenRepository, TokenRepository};
use crate::services::rotation::RotationCoordinator;
use crate::services::token::{JwtTokenAuthority, TokenAuthority, TokenServiceConfig};

use super::mocks::*;

type TestCoordinator<S> = RotationCoordinator<S, JwtTokenAuthority, RecordingNotifier>;

fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: "test-secret".to_string(),
        hash_cost: 4,
        store_timeout: Duration::from_secs(2),
        notify_timeout: Duration::from_millis(100),
        ..TokenServiceConfig::default()
    }
}

fn coordinator_with<S: TokenRepository>(
    store: Arc<S>,
    notifier: Arc<RecordingNotifier>,
    config: TokenServiceConfig,
) -> TestCoordinator<S> {
    let authority = Arc::new(JwtTokenAuthority::new(&config));
    RotationCoordinator::new(store, authority, notifier, config)
}

fn create_test_coordinator() -> (
    TestCoordinator<InMemoryTokenRepository>,
    Arc<InMemoryTokenRepository>,
    Arc<RecordingNotifier>,
) {
    let store = Arc::new(InMemoryTokenRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = coordinator_with(store.clone(), notifier.clone(), test_config());
    (coordinator, store, notifier)
}

fn assert_not_found<T: std::fmt::Debug>(result: Result<T, DomainError>) {
    assert!(
        matches!(result, Err(DomainError::Token(TokenError::TokenNotFound))),
        "expected TokenNotFound, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_issue_then_refresh_from_same_origin() {
    let (coordinator, store, notifier) = create_test_coordinator();

    let pair = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();
    assert_eq!(store.len().await, 1);
    assert_eq!(pair.access_expires_in, 300);

    let record = store.find("u1").await.unwrap().unwrap();
    assert_eq!(record.contact, "a@x.com");
    assert_eq!(record.origin, "1.1.1.1");
    assert_ne!(record.secret_hash, pair.refresh_token);

    let rotated = coordinator
        .refresh_tokens("u1", "1.1.1.1", &pair.refresh_token)
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_rotation_scenario_with_origin_change() {
    let (coordinator, store, notifier) = create_test_coordinator();

    let first = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();

    let second = coordinator
        .refresh_tokens("u1", "1.1.1.1", &first.refresh_token)
        .await
        .unwrap();
    assert_ne!(second.refresh_token, first.refresh_token);

    // The first secret was consumed
    assert_not_found(
        coordinator
            .refresh_tokens("u1", "1.1.1.1", &first.refresh_token)
            .await,
    );

    let third = coordinator
        .refresh_tokens("u1", "2.2.2.2", &second.refresh_token)
        .await
        .unwrap();
    assert_ne!(third.refresh_token, second.refresh_token);

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].subject, "u1");
    assert_eq!(notices[0].contact, "a@x.com");
    assert_eq!(notices[0].old_origin, "1.1.1.1");
    assert_eq!(notices[0].new_origin, "2.2.2.2");

    // Stored origin is not adopted from the redeeming request
    let record = store.find("u1").await.unwrap().unwrap();
    assert_eq!(record.origin, "1.1.1.1");
}

#[tokio::test]
async fn test_unknown_subject_and_wrong_secret_are_indistinguishable() {
    let (coordinator, store, _) = create_test_coordinator();

    let pair = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();
    let before = store.find("u1").await.unwrap().unwrap();

    let unknown = coordinator
        .refresh_tokens("nobody", "1.1.1.1", &pair.refresh_token)
        .await
        .unwrap_err();
    let wrong = coordinator
        .refresh_tokens("u1", "1.1.1.1", "not-the-secret")
        .await
        .unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
    assert!(matches!(wrong, DomainError::Token(TokenError::TokenNotFound)));

    // A failed attempt leaves the record untouched
    assert_eq!(store.find("u1").await.unwrap().unwrap(), before);
    assert!(coordinator
        .refresh_tokens("u1", "1.1.1.1", &pair.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_expired_record_is_deleted() {
    let (coordinator, store, _) = create_test_coordinator();
    let authority = JwtTokenAuthority::new(&test_config());

    let ttl = coordinator.config().refresh_ttl;
    let hash = authority.hash_secret("old-secret").unwrap();
    let mut record = SessionTokenRecord::new("u1", "a@x.com", "1.1.1.1", hash);
    record.issued_at =
        Utc::now() - chrono::Duration::from_std(ttl + Duration::from_secs(1)).unwrap();
    store.save(record).await.unwrap();

    let result = coordinator
        .refresh_tokens("u1", "1.1.1.1", "old-secret")
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
    assert!(store.find("u1").await.unwrap().is_none());

    assert_not_found(
        coordinator
            .refresh_tokens("u1", "1.1.1.1", "old-secret")
            .await,
    );
}

#[tokio::test]
async fn test_secret_is_checked_before_expiry() {
    let (coordinator, store, _) = create_test_coordinator();
    let authority = JwtTokenAuthority::new(&test_config());

    let hash = authority.hash_secret("old-secret").unwrap();
    let mut record = SessionTokenRecord::new("u1", "a@x.com", "1.1.1.1", hash);
    record.issued_at = Utc::now() - chrono::Duration::days(30);
    store.save(record).await.unwrap();

    assert_not_found(
        coordinator
            .refresh_tokens("u1", "1.1.1.1", "guessed-secret")
            .await,
    );
    // Without the secret the record is not deleted
    assert!(store.find("u1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_record_within_ttl_is_not_expired() {
    let (coordinator, store, _) = create_test_coordinator();
    let authority = JwtTokenAuthority::new(&test_config());

    let ttl = coordinator.config().refresh_ttl;
    let hash = authority.hash_secret("secret").unwrap();
    let mut record = SessionTokenRecord::new("u1", "a@x.com", "1.1.1.1", hash);
    record.issued_at =
        Utc::now() - chrono::Duration::from_std(ttl - Duration::from_secs(60)).unwrap();
    store.save(record).await.unwrap();

    assert!(coordinator
        .refresh_tokens("u1", "1.1.1.1", "secret")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_drift_is_reported_even_when_secret_is_wrong() {
    let (coordinator, _, notifier) = create_test_coordinator();

    coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();

    assert_not_found(
        coordinator
            .refresh_tokens("u1", "9.9.9.9", "stolen-guess")
            .await,
    );

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].new_origin, "9.9.9.9");
}

#[tokio::test]
async fn test_failing_notifier_does_not_fail_rotation() {
    let store = Arc::new(InMemoryTokenRepository::new());
    let notifier = Arc::new(RecordingNotifier::failing());
    let coordinator = coordinator_with(store, notifier.clone(), test_config());

    let pair = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();
    let result = coordinator
        .refresh_tokens("u1", "2.2.2.2", &pair.refresh_token)
        .await;

    assert!(result.is_ok());
    assert_eq!(notifier.notices().len(), 1);
}

#[tokio::test]
async fn test_hanging_notifier_is_bounded() {
    let store = Arc::new(InMemoryTokenRepository::new());
    let notifier = Arc::new(RecordingNotifier::hanging());
    let coordinator = coordinator_with(store, notifier.clone(), test_config());

    let pair = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();

    let started = std::time::Instant::now();
    let result = coordinator
        .refresh_tokens("u1", "2.2.2.2", &pair.refresh_token)
        .await;

    assert!(result.is_ok());
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(notifier.notices().len(), 1);
}

#[tokio::test]
async fn test_failed_replace_keeps_previous_secret_valid() {
    let failing = Arc::new(FailingReplaceRepository::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = coordinator_with(failing.clone(), notifier.clone(), test_config());

    let pair = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();
    let before = failing.inner.find("u1").await.unwrap().unwrap();

    let result = coordinator
        .refresh_tokens("u1", "1.1.1.1", &pair.refresh_token)
        .await;
    assert!(matches!(result, Err(DomainError::Store { .. })));
    assert_eq!(failing.inner.find("u1").await.unwrap().unwrap(), before);

    // The same secret still redeems against a healthy store
    let healthy = coordinator_with(Arc::new(failing.inner.clone()), notifier, test_config());
    assert!(healthy
        .refresh_tokens("u1", "1.1.1.1", &pair.refresh_token)
        .await
        .is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_redeems_secret_once() {
    let (coordinator, _, _) = create_test_coordinator();
    let coordinator = Arc::new(coordinator);

    let pair = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let coordinator = coordinator.clone();
            let secret = pair.refresh_token.clone();
            tokio::spawn(async move { coordinator.refresh_tokens("u1", "1.1.1.1", &secret).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(e, DomainError::Token(TokenError::TokenNotFound))),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_reissue_overwrites_previous_session() {
    let (coordinator, store, _) = create_test_coordinator();

    let first = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();
    let second = coordinator
        .issue_tokens("u1", "b@x.com", "3.3.3.3")
        .await
        .unwrap();

    assert_eq!(store.len().await, 1);
    let record = store.find("u1").await.unwrap().unwrap();
    assert_eq!(record.contact, "b@x.com");
    assert_eq!(record.origin, "3.3.3.3");

    assert_not_found(
        coordinator
            .refresh_tokens("u1", "3.3.3.3", &first.refresh_token)
            .await,
    );
    assert!(coordinator
        .refresh_tokens("u1", "3.3.3.3", &second.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_signing_failure_persists_nothing() {
    let store = Arc::new(InMemoryTokenRepository::new());
    let config = TokenServiceConfig {
        jwt_secret: String::new(),
        ..test_config()
    };
    let coordinator = coordinator_with(store.clone(), Arc::new(RecordingNotifier::new()), config);

    let result = coordinator.issue_tokens("u1", "a@x.com", "1.1.1.1").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Signing { .. }))
    ));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_hashing_failure_persists_nothing() {
    let store = Arc::new(InMemoryTokenRepository::new());
    let config = TokenServiceConfig {
        hash_cost: 2,
        ..test_config()
    };
    let coordinator = coordinator_with(store.clone(), Arc::new(RecordingNotifier::new()), config);

    let result = coordinator.issue_tokens("u1", "a@x.com", "1.1.1.1").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Hashing { .. }))
    ));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_store_operations_are_bounded() {
    let config = TokenServiceConfig {
        store_timeout: Duration::from_millis(50),
        ..test_config()
    };
    let coordinator = coordinator_with(
        Arc::new(HangingRepository),
        Arc::new(RecordingNotifier::new()),
        config,
    );

    let issued = coordinator.issue_tokens("u1", "a@x.com", "1.1.1.1").await;
    assert!(matches!(issued, Err(DomainError::Store { .. })));

    let refreshed = coordinator.refresh_tokens("u1", "1.1.1.1", "secret").await;
    assert!(matches!(refreshed, Err(DomainError::Store { .. })));
}

#[tokio::test]
async fn test_empty_subject_is_rejected() {
    let (coordinator, store, _) = create_test_coordinator();

    let result = coordinator.issue_tokens("", "a@x.com", "1.1.1.1").await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_access_tokens_identify_subject() {
    let (coordinator, _, _) = create_test_coordinator();
    let verifier = JwtTokenAuthority::new(&test_config());

    let issued = coordinator
        .issue_tokens("u1", "a@x.com", "1.1.1.1")
        .await
        .unwrap();
    let claims = verifier.verify_access_token(&issued.access_token).unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.exp - claims.iat, 300);

    let rotated = coordinator
        .refresh_tokens("u1", "1.1.1.1", &issued.refresh_token)
        .await
        .unwrap();
    let claims = verifier.verify_access_token(&rotated.access_token).unwrap();
    assert_eq!(claims.sub, "u1");
    assert_ne!(rotated.access_token, issued.access_token);
}
