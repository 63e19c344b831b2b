//! Integration tests for the analysis and recommendation handlers.
//!
//! Handlers are driven end to end through in-memory and file adapters.

use std::sync::Arc;

use decision_debt::adapters::{
    FileRecordSource, InMemoryRecordStore, InMemoryReportSink, JsonReportWriter, ReportTarget,
};
use decision_debt::application::{
    AnalyzeContextsCommand, AnalyzeContextsHandler, CandidateSelection, RecommendActionsCommand,
    RecommendActionsHandler,
};
use decision_debt::domain::analysis::{Completeness, EngineSettings, Signal};
use decision_debt::domain::foundation::{ContextId, ErrorCode, RecordId, RecordKind, Timestamp};
use decision_debt::domain::record::{Record, RecordSnapshot, Tags};
use decision_debt::ports::ContextOutcome;

// ════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════

fn rid(s: &str) -> RecordId {
    RecordId::new(s).unwrap()
}

fn ctx(s: &str) -> ContextId {
    ContextId::new(s).unwrap()
}

fn record(id: &str, kind: RecordKind, context: &str, links: &[&str]) -> Record {
    let mut record = Record::new(rid(id), kind, ctx(context), Timestamp::from_unix_secs(1_700_000_000).unwrap());
    for target in links {
        record = record.with_link(rid(target));
    }
    record
}

fn analyze_handler(records: Vec<Record>) -> (AnalyzeContextsHandler, Arc<InMemoryReportSink>) {
    let sink = Arc::new(InMemoryReportSink::new());
    let handler = AnalyzeContextsHandler::new(
        Arc::new(InMemoryRecordStore::with_records(records)),
        sink.clone(),
        EngineSettings::default(),
    );
    (handler, sink)
}

fn recommend_handler(records: Vec<Record>) -> (RecommendActionsHandler, Arc<InMemoryReportSink>) {
    let sink = Arc::new(InMemoryReportSink::new());
    let handler = RecommendActionsHandler::new(
        Arc::new(InMemoryRecordStore::with_records(records)),
        sink.clone(),
        EngineSettings::default(),
    );
    (handler, sink)
}

// ════════════════════════════════════════════════════════════════════════════
// Analysis
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn cause_with_action_but_no_outcome_is_action_only_debt() {
    let (handler, sink) = analyze_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &["A1"]),
        record("A1", RecordKind::Action, "TeamA", &[]),
    ]);

    let report = handler.handle(AnalyzeContextsCommand::all()).await.unwrap();

    let outcome = &report.contexts[&ctx("TeamA")];
    let chains = match outcome {
        ContextOutcome::Analyzed { chains, .. } => chains,
        ContextOutcome::Failed(failure) => panic!("TeamA failed: {:?}", failure),
    };
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].completeness, Completeness::ActionOnly);

    let metrics = outcome.metrics().unwrap();
    assert_eq!(metrics.coverage.action_ratio.value(), 1.0);
    assert_eq!(metrics.coverage.outcome_ratio.value(), 0.0);
    assert_eq!(metrics.debt.value(), 1.0);

    assert_eq!(sink.reports().await.len(), 1);
}

#[tokio::test]
async fn broken_context_is_reported_without_failing_the_run() {
    let (handler, _sink) = analyze_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &["A1"]),
        record("A1", RecordKind::Action, "TeamA", &["O1"]),
        record("O1", RecordKind::Outcome, "TeamA", &[]),
        // Cause linking straight to an outcome is not a permitted direction
        record("C2", RecordKind::Cause, "TeamB", &["O2"]),
        record("O2", RecordKind::Outcome, "TeamB", &[]),
    ]);

    let report = handler.handle(AnalyzeContextsCommand::all()).await.unwrap();

    assert!(!report.contexts[&ctx("TeamA")].is_failed());
    match &report.contexts[&ctx("TeamB")] {
        ContextOutcome::Failed(failure) => {
            assert_eq!(failure.code, "MALFORMED_LINK");
            assert_eq!(failure.record, Some(rid("C2")));
        }
        other => panic!("Expected TeamB to fail, got {:?}", other),
    }

    assert_eq!(report.maturity.len(), 1);
    assert_eq!(report.maturity[0].context, ctx("TeamA"));
    assert_eq!(report.failed_contexts().count(), 1);
}

#[tokio::test]
async fn cycle_fails_only_its_context() {
    let (handler, _sink) = analyze_handler(vec![
        record("A1", RecordKind::Action, "TeamA", &["O1"]),
        record("O1", RecordKind::Outcome, "TeamA", &["A1"]),
        record("C9", RecordKind::Cause, "TeamB", &[]),
    ]);

    let report = handler.handle(AnalyzeContextsCommand::all()).await.unwrap();

    match &report.contexts[&ctx("TeamA")] {
        ContextOutcome::Failed(failure) => {
            assert_eq!(failure.code, "CYCLE_DETECTED");
            assert!(failure.message.contains("A1 -> O1 -> A1"));
        }
        other => panic!("Expected a cycle failure, got {:?}", other),
    }
    let team_b = report.contexts[&ctx("TeamB")].metrics().unwrap();
    assert_eq!(team_b.distribution.cause_only, 1);
}

#[tokio::test]
async fn requesting_an_unknown_context_fails() {
    let (handler, sink) = analyze_handler(vec![record("C1", RecordKind::Cause, "TeamA", &[])]);

    let err = handler
        .handle(AnalyzeContextsCommand::only(vec![ctx("TeamZ")]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ContextNotFound);
    assert_eq!(err.details.get("context"), Some(&"TeamZ".to_string()));
    assert!(sink.reports().await.is_empty());
}

#[tokio::test]
async fn context_selection_restricts_the_report() {
    let (handler, _sink) = analyze_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &[]),
        record("C2", RecordKind::Cause, "TeamB", &[]),
        record("C3", RecordKind::Cause, "TeamC", &[]),
    ]);

    let report = handler
        .handle(AnalyzeContextsCommand::only(vec![ctx("TeamC"), ctx("TeamA")]))
        .await
        .unwrap();

    let contexts: Vec<_> = report.contexts.keys().map(ContextId::as_str).collect();
    assert_eq!(contexts, vec!["TeamA", "TeamC"]);
    assert_eq!(report.record_count, 2);
}

#[tokio::test]
async fn report_carries_description_signals_for_every_selected_context() {
    let (handler, _sink) = analyze_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &["A1"])
            .with_description("Login failed with an authentication timeout."),
        record("A1", RecordKind::Action, "TeamA", &[])
            .with_description("Rollback the token service after the error."),
        // Cycle: the context fails but its descriptions are still mined
        record("A2", RecordKind::Action, "TeamB", &["O2"]).with_description("Restart the queue."),
        record("O2", RecordKind::Outcome, "TeamB", &["A2"]),
        record("C3", RecordKind::Cause, "TeamC", &[]).with_description("Disk latency issue."),
    ]);

    let report = handler
        .handle(AnalyzeContextsCommand::only(vec![ctx("TeamA"), ctx("TeamB")]))
        .await
        .unwrap();

    let keys: Vec<_> = report.signals.keys().map(ContextId::as_str).collect();
    assert_eq!(keys, vec!["TeamA", "TeamB"]);

    let team_a = &report.signals[&ctx("TeamA")];
    assert_eq!(team_a.issue_mentions, 2);
    assert_eq!(team_a.fix_mentions, 1);
    assert_eq!(team_a.issue_fix_pairs, vec![rid("A1")]);

    assert!(report.contexts[&ctx("TeamB")].is_failed());
    let team_b = &report.signals[&ctx("TeamB")];
    assert_eq!(team_b.described, 1);
    assert_eq!(team_b.fix_density.value(), 1.0);
}

#[tokio::test]
async fn maturity_prefers_the_context_that_closes_its_chains() {
    let (handler, _sink) = analyze_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &[]),
        record("C2", RecordKind::Cause, "TeamB", &["A2"]),
        record("A2", RecordKind::Action, "TeamB", &["O2"]),
        record("O2", RecordKind::Outcome, "TeamB", &[]),
    ]);

    let report = handler.handle(AnalyzeContextsCommand::all()).await.unwrap();

    let order: Vec<_> = report.maturity.iter().map(|r| r.context.as_str()).collect();
    assert_eq!(order, vec!["TeamB", "TeamA"]);
    assert_eq!(report.maturity[0].rank, 1);
}

#[tokio::test]
async fn same_snapshot_yields_same_fingerprint_and_results() {
    let records = vec![
        record("C1", RecordKind::Cause, "TeamA", &["A1"]),
        record("A1", RecordKind::Action, "TeamA", &[]),
        record("A7", RecordKind::Action, "TeamB", &[]),
    ];
    let (first, _) = analyze_handler(records.clone());
    let (second, _) = analyze_handler(records.into_iter().rev().collect());

    let a = first.handle(AnalyzeContextsCommand::all()).await.unwrap();
    let b = second.handle(AnalyzeContextsCommand::all()).await.unwrap();

    assert_eq!(a.snapshot_fingerprint, b.snapshot_fingerprint);
    assert_eq!(a.contexts, b.contexts);
    assert_eq!(a.maturity, b.maturity);
    assert_ne!(a.run_id, b.run_id);
}

#[tokio::test]
async fn unavailable_source_is_passed_through() {
    let handler = AnalyzeContextsHandler::new(
        Arc::new(InMemoryRecordStore::unavailable()),
        Arc::new(InMemoryReportSink::new()),
        EngineSettings::default(),
    );

    let err = handler.handle(AnalyzeContextsCommand::all()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SourceUnavailable);
}

#[tokio::test]
async fn failing_sink_fails_the_run() {
    let handler = AnalyzeContextsHandler::new(
        Arc::new(InMemoryRecordStore::with_records(vec![record(
            "C1",
            RecordKind::Cause,
            "TeamA",
            &[],
        )])),
        Arc::new(InMemoryReportSink::failing()),
        EngineSettings::default(),
    );

    let err = handler.handle(AnalyzeContextsCommand::all()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SinkUnavailable);
}

#[tokio::test]
async fn snapshot_file_round_trip_through_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("records").join("teams.yaml");
    let report_path = dir.path().join("report.json");

    let snapshot = RecordSnapshot::from_records(vec![
        record("C1", RecordKind::Cause, "TeamA", &["A1"]),
        record("A1", RecordKind::Action, "TeamA", &["O1"]),
        record("O1", RecordKind::Outcome, "TeamA", &[]),
    ])
    .unwrap();
    let source = FileRecordSource::new(&snapshot_path);
    source.write_snapshot(snapshot).await.unwrap();

    let handler = AnalyzeContextsHandler::new(
        Arc::new(source),
        Arc::new(JsonReportWriter::new(ReportTarget::File(report_path.clone()))),
        EngineSettings::default(),
    );
    handler.handle(AnalyzeContextsCommand::all()).await.unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    let team_a = &written["contexts"]["TeamA"];
    assert_eq!(team_a["status"], "analyzed");
    assert_eq!(team_a["chains"][0]["completeness"], "complete");
    assert_eq!(written["record_count"], 3);
}

// ════════════════════════════════════════════════════════════════════════════
// Recommendations
// ════════════════════════════════════════════════════════════════════════════

fn tagged(id: &str, kind: RecordKind, tags: Tags) -> Record {
    record(id, kind, "TeamA", &[]).with_tags(tags)
}

#[tokio::test]
async fn candidate_matching_every_constraint_ranks_first() {
    let db_high = Tags::new().with("system", "db").with("severity", "high");
    let (handler, sink) = recommend_handler(vec![
        tagged("C1", RecordKind::Cause, db_high.clone()),
        tagged("A1", RecordKind::Action, db_high),
        tagged("A2", RecordKind::Action, Tags::new().with("system", "cache").with("team", "web")),
    ]);

    let result = handler
        .handle(RecommendActionsCommand {
            cause: rid("C1"),
            candidates: CandidateSelection::Explicit(vec![rid("A2"), rid("A1")]),
        })
        .await
        .unwrap();

    let top = &result.summary.top;
    assert_eq!(top.candidate, rid("A1"));
    assert_eq!(top.rank, 1);
    assert_eq!(top.sub_scores.constraint, 1.0);
    assert_eq!(result.report.scorecards[1].sub_scores.constraint, 0.0);
    assert!(top.evidence_for(Signal::Constraint).next().is_some());

    assert_eq!(result.report.context, ctx("TeamA"));
    assert_eq!(sink.recommendations().await.len(), 1);
}

#[tokio::test]
async fn empty_candidate_list_is_rejected() {
    let (handler, sink) = recommend_handler(vec![tagged("C1", RecordKind::Cause, Tags::new())]);

    let err = handler
        .handle(RecommendActionsCommand {
            cause: rid("C1"),
            candidates: CandidateSelection::Explicit(vec![]),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NoCandidates);
    assert!(sink.recommendations().await.is_empty());
}

#[tokio::test]
async fn history_selection_ranks_unlinked_actions() {
    let (handler, _sink) = recommend_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &["A1"]),
        record("A1", RecordKind::Action, "TeamA", &[]),
        record("A2", RecordKind::Action, "TeamA", &[]),
        record("A3", RecordKind::Action, "TeamA", &["O3"]),
        record("O3", RecordKind::Outcome, "TeamA", &[]),
        record("A9", RecordKind::Action, "TeamB", &[]),
    ]);

    let result = handler
        .handle(RecommendActionsCommand {
            cause: rid("C1"),
            candidates: CandidateSelection::FromHistory,
        })
        .await
        .unwrap();

    let mut ranked: Vec<_> = result
        .report
        .scorecards
        .iter()
        .map(|c| c.candidate.as_str())
        .collect();
    ranked.sort();
    assert_eq!(ranked, vec!["A2", "A3"]);
}

#[tokio::test]
async fn unknown_cause_is_not_found() {
    let (handler, _sink) = recommend_handler(vec![record("A1", RecordKind::Action, "TeamA", &[])]);

    let err = handler
        .handle(RecommendActionsCommand {
            cause: rid("C404"),
            candidates: CandidateSelection::Explicit(vec![rid("A1")]),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RecordNotFound);
}

#[tokio::test]
async fn outcome_is_not_a_valid_candidate() {
    let (handler, _sink) = recommend_handler(vec![
        record("C1", RecordKind::Cause, "TeamA", &[]),
        record("O1", RecordKind::Outcome, "TeamA", &[]),
    ]);

    let err = handler
        .handle(RecommendActionsCommand {
            cause: rid("C1"),
            candidates: CandidateSelection::Explicit(vec![rid("O1")]),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidRecordKind);
}

#[tokio::test]
async fn recommendation_is_independent_of_candidate_order() {
    let records = vec![
        record("C1", RecordKind::Cause, "TeamA", &[]),
        record("A1", RecordKind::Action, "TeamA", &["O1"]),
        record("O1", RecordKind::Outcome, "TeamA", &[]),
        record("A2", RecordKind::Action, "TeamA", &[]),
        record("A3", RecordKind::Action, "TeamA", &[]),
    ];
    let (handler, _sink) = recommend_handler(records);

    let forward = handler
        .handle(RecommendActionsCommand {
            cause: rid("C1"),
            candidates: CandidateSelection::Explicit(vec![rid("A1"), rid("A2"), rid("A3")]),
        })
        .await
        .unwrap();
    let backward = handler
        .handle(RecommendActionsCommand {
            cause: rid("C1"),
            candidates: CandidateSelection::Explicit(vec![rid("A3"), rid("A2"), rid("A1")]),
        })
        .await
        .unwrap();

    assert_eq!(forward.report.scorecards, backward.report.scorecards);
    // Equal scores fall back to candidate id
    assert_eq!(forward.summary.top.candidate, rid("A1"));
}
