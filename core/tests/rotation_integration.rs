//! Integration tests for the rotation coordinator behind trait objects

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    use sa_core::domain::value_objects::OriginDrift;
    use sa_core::errors::{DomainError, TokenError};
    use sa_core::repositories::{InMemoryTokenRepository, TokenRepository};
    use sa_core::services::{
        JwtTokenAuthority, Notifier, RotationCoordinator, TokenServiceConfig,
    };

    #[derive(Default)]
    struct CollectingNotifier {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for CollectingNotifier {
        async fn notify(&self, drift: &OriginDrift) -> Result<(), DomainError> {
            self.seen
                .lock()
                .unwrap()
                .push((drift.old_origin.clone(), drift.new_origin.clone()));
            Ok(())
        }
    }

    type DynCoordinator = RotationCoordinator<dyn TokenRepository, JwtTokenAuthority, dyn Notifier>;

    fn build() -> (DynCoordinator, Arc<CollectingNotifier>) {
        let config = TokenServiceConfig {
            jwt_secret: "integration-secret".to_string(),
            hash_cost: 4,
            ..TokenServiceConfig::default()
        };
        let store: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::new());
        let notifier = Arc::new(CollectingNotifier::default());
        let dyn_notifier: Arc<dyn Notifier> = notifier.clone();
        let authority = Arc::new(JwtTokenAuthority::new(&config));
        (
            RotationCoordinator::new(store, authority, dyn_notifier, config),
            notifier,
        )
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (coordinator, notifier) = build();

        let r1 = coordinator
            .issue_tokens("u1", "a@x.com", "1.1.1.1")
            .await
            .unwrap();
        let r2 = coordinator
            .refresh_tokens("u1", "1.1.1.1", &r1.refresh_token)
            .await
            .unwrap();

        let replay = coordinator
            .refresh_tokens("u1", "1.1.1.1", &r1.refresh_token)
            .await;
        assert!(matches!(
            replay,
            Err(DomainError::Token(TokenError::TokenNotFound))
        ));

        coordinator
            .refresh_tokens("u1", "2.2.2.2", &r2.refresh_token)
            .await
            .unwrap();

        let seen = notifier.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![("1.1.1.1".to_string(), "2.2.2.2".to_string())]);
    }

    #[tokio::test]
    async fn test_subjects_are_independent() {
        let (coordinator, _) = build();

        let a = coordinator
            .issue_tokens("alice", "a@x.com", "1.1.1.1")
            .await
            .unwrap();
        let b = coordinator
            .issue_tokens("bob", "b@x.com", "1.1.1.1")
            .await
            .unwrap();

        // Secrets are bound to their own subject
        let crossed = coordinator
            .refresh_tokens("alice", "1.1.1.1", &b.refresh_token)
            .await;
        assert!(crossed.is_err());

        assert!(coordinator
            .refresh_tokens("alice", "1.1.1.1", &a.refresh_token)
            .await
            .is_ok());
        assert!(coordinator
            .refresh_tokens("bob", "1.1.1.1", &b.refresh_token)
            .await
            .is_ok());
    }
}
