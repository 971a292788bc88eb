//! Test: the trigger gate guards the whole run

use crate::helpers::*;
use release_gate::core::{ReleaseConfig, ReleaseEvent, RejectReason, RunOutcome};

#[tokio::test]
async fn test_unmerged_pull_request_runs_nothing() {
    let mut event = release_event();
    event.merged = Some(false);

    let result = run_default(&event).await;

    assert_nothing_ran(&result);
    assert!(matches!(
        result.report.outcome,
        RunOutcome::GateRejected(RejectReason::NotMerged)
    ));
}

#[tokio::test]
async fn test_titles_without_marker_run_nothing() {
    for title in [
        "Release 1.2.0",
        "Release 1.2.0 /workflows/publish-extra",
        "/workflows/publish Release 1.2.0",
        "Release 1.2.0 /workflows/Publish",
        "Release 1.2.0 /workflows/publish\n",
    ] {
        let result = run_default(&merged_event(title)).await;
        assert_nothing_ran(&result);
        assert!(
            matches!(
                result.report.outcome,
                RunOutcome::GateRejected(RejectReason::TitleMismatch)
            ),
            "title {:?} should not trigger a release",
            title
        );
    }
}

#[tokio::test]
async fn test_release_title_proceeds() {
    let result = run_default(&merged_event("Release 1.2.0 /workflows/publish")).await;

    assert!(matches!(result.report.outcome, RunOutcome::Published));
    assert_eq!(result.executor.calls().len(), 3);
}

#[tokio::test]
async fn test_missing_fields_run_nothing() {
    let result = run_default(&ReleaseEvent::default()).await;
    assert_nothing_ran(&result);

    let mut event = release_event();
    event.title = None;
    let result = run_default(&event).await;
    assert_nothing_ran(&result);
}

#[tokio::test]
async fn test_configured_suffix_replaces_default() {
    let config = ReleaseConfig::from_yaml("trigger:\n  title_suffix: \"[release]\"\n").unwrap();

    let result = run_scenario(
        config.clone(),
        &merged_event("Release 1.2.0 /workflows/publish"),
        MockExecutor::new(),
        MockNotifier::new(),
    )
    .await;
    assert_nothing_ran(&result);

    let result = run_scenario(
        config,
        &merged_event("Release 1.2.0 [release]"),
        MockExecutor::new(),
        MockNotifier::new(),
    )
    .await;
    assert!(matches!(result.report.outcome, RunOutcome::Published));
}
