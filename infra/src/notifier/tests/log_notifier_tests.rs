//! Tests for the log notifier

use sa_core::domain::value_objects::OriginDrift;
use sa_core::services::Notifier;
use sa_shared::config::NotifierConfig;

use crate::notifier::LogNotifier;

fn drift() -> OriginDrift {
    OriginDrift {
        subject: "u1".to_string(),
        contact: "a@x.com".to_string(),
        old_origin: "1.1.1.1".to_string(),
        new_origin: "2.2.2.2".to_string(),
    }
}

#[tokio::test]
async fn test_notify_succeeds() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let notifier = LogNotifier::new(NotifierConfig::default());
    assert!(notifier.notify(&drift()).await.is_ok());
}

#[test]
fn test_notice_mentions_both_origins() {
    let body = LogNotifier::body(&drift());
    assert!(body.contains("1.1.1.1"));
    assert!(body.contains("2.2.2.2"));
    assert!(LogNotifier::subject_line(&drift()).contains("u1"));
}
