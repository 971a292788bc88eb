//! Test: the first failing step halts the run

use crate::helpers::*;
use release_gate::core::{ReleaseConfig, ReleaseStep, RunOutcome, RunState};
use release_gate::execution::{ReleaseError, RunEvent};

#[tokio::test]
async fn test_build_failure_stops_everything() {
    let result = run_scenario(
        ReleaseConfig::default(),
        &release_event(),
        MockExecutor::failing_at(ReleaseStep::Build, 101),
        MockNotifier::new(),
    )
    .await;

    assert_eq!(result.failed_step(), Some(ReleaseStep::Build));
    assert_eq!(result.executor.steps_run(), vec![ReleaseStep::Build]);
    assert!(result.notifier.comments().is_empty());
    assert_eq!(result.report.record.state, RunState::Failed(ReleaseStep::Build));
    assert_eq!(result.report.outcome.exit_code(), 101);
    assert!(matches!(
        result.report.outcome,
        RunOutcome::Failed {
            error: ReleaseError::BuildFailed(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_doc_failure_skips_publish() {
    let result = run_scenario(
        ReleaseConfig::default(),
        &release_event(),
        MockExecutor::failing_at(ReleaseStep::Document, 1),
        MockNotifier::new(),
    )
    .await;

    assert_eq!(result.failed_step(), Some(ReleaseStep::Document));
    assert_eq!(
        result.executor.steps_run(),
        vec![ReleaseStep::Build, ReleaseStep::Document]
    );
    assert!(result.notifier.comments().is_empty());
    match &result.report.outcome {
        RunOutcome::Failed { error, .. } => {
            assert!(error.to_string().contains("doc generation failed"))
        }
        other => panic!("expected doc failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_publish_failure_posts_no_comment() {
    let result = run_scenario(
        ReleaseConfig::default(),
        &release_event(),
        MockExecutor::failing_at(ReleaseStep::Publish, 101),
        MockNotifier::new(),
    )
    .await;

    assert_eq!(result.failed_step(), Some(ReleaseStep::Publish));
    assert_eq!(result.notifier.comments().len(), 0);
    assert_eq!(result.report.outcome.exit_code(), 101);

    let failed: Vec<_> = result
        .events
        .iter()
        .filter(|e| matches!(e, RunEvent::StepFailed { .. }))
        .collect();
    assert_eq!(failed.len(), 1);
}

#[tokio::test]
async fn test_steps_run_in_order_with_default_commands() {
    let result = run_default(&release_event()).await;

    let displays: Vec<String> = result.executor.calls().iter().map(|c| c.display.clone()).collect();
    assert_eq!(
        displays,
        vec![
            "cargo build --release",
            "cargo doc --no-deps",
            "cargo publish --workspace --token ***",
        ]
    );
    assert_eq!(
        result.report.record.executed_steps(),
        ReleaseStep::ALL.to_vec()
    );
    assert!(result.report.record.steps.iter().all(|s| s.succeeded));
}

#[tokio::test]
async fn test_publish_receives_credential_and_never_logs_it() {
    let result = run_default(&release_event()).await;

    let publish = result
        .executor
        .calls()
        .into_iter()
        .find(|c| c.step == ReleaseStep::Publish)
        .unwrap();
    assert_eq!(
        publish.full_args,
        vec!["publish", "--workspace", "--token", "cio_test_token"]
    );

    // Only publish gets the secret
    for call in result.executor.calls() {
        if call.step != ReleaseStep::Publish {
            assert!(!call.full_args.iter().any(|a| a == "cio_test_token"));
        }
    }
    for event in &result.events {
        assert!(!format!("{:?}", event).contains("cio_test_token"));
    }
}
