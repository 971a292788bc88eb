//! Test: the success comment after publishing

use crate::helpers::*;
use release_gate::core::{ReleaseConfig, ReleaseStep, RunOutcome, RunState};
use release_gate::execution::ReleaseError;
use release_gate::notify::NotifyError;

#[tokio::test]
async fn test_successful_publish_posts_one_comment() {
    let result = run_default(&release_event()).await;

    assert!(matches!(result.report.outcome, RunOutcome::Published));
    assert_eq!(result.report.record.state, RunState::Done);

    let comments = result.notifier.comments();
    assert_eq!(comments.len(), 1);
    let (target, body) = &comments[0];
    assert_eq!(target.to_string(), "polywrap/rust-msgpack-serde#42");
    assert!(body.contains("crates.io/crates/polywrap_msgpack_serde/versions"));
}

#[tokio::test]
async fn test_notify_failure_keeps_publish() {
    let result = run_scenario(
        ReleaseConfig::default(),
        &release_event(),
        MockExecutor::new(),
        MockNotifier::rejecting(403),
    )
    .await;

    assert_eq!(result.failed_step(), Some(ReleaseStep::Notify));
    // publish already ran and is not undone
    assert_eq!(
        result.executor.steps_run(),
        vec![ReleaseStep::Build, ReleaseStep::Document, ReleaseStep::Publish]
    );
    assert_eq!(result.notifier.comments().len(), 1);
    assert_eq!(result.report.outcome.exit_code(), 1);
    assert!(matches!(
        result.report.outcome,
        RunOutcome::Failed {
            error: ReleaseError::NotifyFailed(NotifyError::Status { status: 403, .. }),
            ..
        }
    ));
}

#[tokio::test]
async fn test_event_without_number_fails_notify() {
    let mut event = release_event();
    event.number = None;

    let result = run_default(&event).await;

    assert_eq!(result.failed_step(), Some(ReleaseStep::Notify));
    assert!(result.notifier.comments().is_empty());
    assert!(matches!(
        result.report.outcome,
        RunOutcome::Failed {
            error: ReleaseError::NotifyFailed(NotifyError::IncompleteEvent(_)),
            ..
        }
    ));
}

#[tokio::test]
async fn test_comment_uses_configured_message_and_crate() {
    let yaml = r#"
registry:
  crate_name: "my_crate"
notify:
  message: "Shipped!"
"#;
    let config = ReleaseConfig::from_yaml(yaml).unwrap();

    let result = run_scenario(
        config,
        &release_event(),
        MockExecutor::new(),
        MockNotifier::new(),
    )
    .await;

    let comments = result.notifier.comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments[0].1,
        "Shipped!\n\nhttps://crates.io/crates/my_crate/versions"
    );
}
