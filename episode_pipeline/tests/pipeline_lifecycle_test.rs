// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end stage-graph runs against the in-memory harness: a fresh
//! episode stopping at its first review gate, idempotent re-runs, a
//! forced re-run cascading a downstream invalidation, and a reject at the
//! final gate reverting the episode's status.

mod common;

use common::{build_harness, fixed_now};
use episode_pipeline_domain::entities::Episode;
use episode_pipeline_domain::value_objects::{EpisodeStatus, ReviewDecisionKind, Stage, StageOutcome, StoppedOn};

async fn seed_episode(h: &common::Harness, id: &str) -> Episode {
    let episode = Episode::new(id.to_string(), 2, fixed_now()).unwrap();
    h.context.episode_repo.insert(&episode).await.unwrap();
    episode
}

#[tokio::test]
async fn fresh_run_stops_at_first_review_gate() {
    let h = build_harness().await;
    seed_episode(&h, "ep-001").await;

    let report = h.executor.run_for_episode("ep-001", false).await.unwrap();

    assert!(report.success, "no stage should fail: {:?}", report.stages);
    assert_eq!(report.stopped_on, StoppedOn::ReviewPending);

    let gate = report.stages.iter().find(|s| s.name == Stage::ReviewGate1).unwrap();
    assert_eq!(gate.outcome, StageOutcome::ReviewPending);

    let episode = h.context.episode_repo.find_by_id(&"ep-001".to_string()).await.unwrap().unwrap();
    assert_eq!(episode.status(), EpisodeStatus::Corrected);

    let pending = h.context.review_task_repo.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].stage, Stage::Correct);
}

#[tokio::test]
async fn idempotent_rerun_skips_completed_stages_and_reuses_the_pending_task() {
    let h = build_harness().await;
    seed_episode(&h, "ep-002").await;

    h.executor.run_for_episode("ep-002", false).await.unwrap();
    let report2 = h.executor.run_for_episode("ep-002", false).await.unwrap();

    assert_eq!(report2.stopped_on, StoppedOn::ReviewPending);
    let download = report2.stages.iter().find(|s| s.name == Stage::Download).unwrap();
    assert_eq!(download.outcome, StageOutcome::Skipped);
    let transcribe = report2.stages.iter().find(|s| s.name == Stage::Transcribe).unwrap();
    assert_eq!(transcribe.outcome, StageOutcome::Skipped);
    let correct = report2.stages.iter().find(|s| s.name == Stage::Correct).unwrap();
    assert_eq!(correct.outcome, StageOutcome::Skipped);

    // Re-encountering the gate must not create a second task for the same
    // (episode, stage) pair.
    let pending = h.context.review_task_repo.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn approving_the_gate_lets_the_run_continue_to_the_next_gate() {
    let h = build_harness().await;
    seed_episode(&h, "ep-003").await;

    h.executor.run_for_episode("ep-003", false).await.unwrap();
    let pending = h.context.review_task_repo.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    let task_id = pending[0].id;

    h.review_coordinator
        .decide(&h.context, &task_id, ReviewDecisionKind::Approved, None)
        .await
        .unwrap();

    let report = h.executor.run_for_episode("ep-003", false).await.unwrap();
    assert!(report.success, "no stage should fail: {:?}", report.stages);
    assert_eq!(report.stopped_on, StoppedOn::ReviewPending);

    let gate1 = report.stages.iter().find(|s| s.name == Stage::ReviewGate1).unwrap();
    assert_eq!(gate1.outcome, StageOutcome::Success, "approved gate must not re-pend");
    let translate = report.stages.iter().find(|s| s.name == Stage::Translate).unwrap();
    assert_eq!(translate.outcome, StageOutcome::Success);
    let adapt = report.stages.iter().find(|s| s.name == Stage::Adapt).unwrap();
    assert_eq!(adapt.outcome, StageOutcome::Success);
    let gate2 = report.stages.iter().find(|s| s.name == Stage::ReviewGate2).unwrap();
    assert_eq!(gate2.outcome, StageOutcome::ReviewPending);

    let episode = h.context.episode_repo.find_by_id(&"ep-003".to_string()).await.unwrap().unwrap();
    assert_eq!(episode.status(), EpisodeStatus::Adapted);
}

#[tokio::test]
async fn forcing_a_completed_stage_regenerates_its_output_and_cascades_invalidation() {
    let h = build_harness().await;
    seed_episode(&h, "ep-004").await;

    h.executor.run_for_episode("ep-004", false).await.unwrap();
    let task_id = h.context.review_task_repo.list_pending().await.unwrap()[0].id;
    h.review_coordinator
        .decide(&h.context, &task_id, ReviewDecisionKind::Approved, None)
        .await
        .unwrap();
    // Carries the episode through translate + adapt, stopping at gate 2.
    h.executor.run_for_episode("ep-004", false).await.unwrap();

    let layout = h.context.layout("ep-004");
    let translated_before = tokio::fs::read_to_string(layout.transcript_translated()).await.unwrap();
    let adapted_stale_marker = layout.script_adapted().with_extension("md.stale");

    // `translate` already ran; without force a third run is a pure no-op.
    let report_noop = h.executor.run_for_episode("ep-004", false).await.unwrap();
    assert_eq!(
        report_noop.stages.iter().find(|s| s.name == Stage::Translate).unwrap().outcome,
        StageOutcome::Skipped
    );
    assert!(tokio::fs::metadata(&adapted_stale_marker).await.is_err());

    // With the episode parked at `review_gate_2`, `force` re-runs
    // `translate` (the stage already reached in this run-graph position is
    // `review_gate_2`, so `translate`/`adapt` are already `is_at_or_past`
    // and skipped too) -- force only re-dispatches the stage the episode
    // currently sits at, so park it back at `Corrected` first to exercise
    // translate's forced re-run deterministically.
    let mut episode = h.context.episode_repo.find_by_id(&"ep-004".to_string()).await.unwrap().unwrap();
    episode.revert_to(EpisodeStatus::Corrected, fixed_now());
    h.context.episode_repo.update(&episode).await.unwrap();

    let report_forced = h.executor.run_for_episode("ep-004", true).await.unwrap();
    let translate_result = report_forced.stages.iter().find(|s| s.name == Stage::Translate).unwrap();
    assert_eq!(translate_result.outcome, StageOutcome::Success, "force must re-dispatch translate");

    let translated_after = tokio::fs::read_to_string(layout.transcript_translated()).await.unwrap();
    assert_eq!(translated_before, translated_after, "dry-run driver output is deterministic per model");

    // translate invalidates adapt (§4.3 cascade map): forcing translate
    // must stale-mark adapt's output before adapt re-runs and clears it.
    // Since this run continues straight through adapt, the marker is
    // written and cleared within the same pass -- assert the downstream
    // adapt stage actually re-executed rather than skipping.
    let adapt_result = report_forced.stages.iter().find(|s| s.name == Stage::Adapt).unwrap();
    assert_eq!(adapt_result.outcome, StageOutcome::Success, "cascade must force adapt to redo its work");
}

#[tokio::test]
async fn rejecting_the_gate_reverts_episode_status() {
    let h = build_harness().await;
    seed_episode(&h, "ep-005").await;

    h.executor.run_for_episode("ep-005", false).await.unwrap();
    let task_id = h.context.review_task_repo.list_pending().await.unwrap()[0].id;

    let task = h
        .review_coordinator
        .decide(&h.context, &task_id, ReviewDecisionKind::Rejected, Some("redo the correction pass".to_string()))
        .await
        .unwrap();
    assert!(task.status.is_decided());

    let episode = h.context.episode_repo.find_by_id(&"ep-005".to_string()).await.unwrap().unwrap();
    assert_eq!(episode.status(), EpisodeStatus::Transcribed, "reject must revert past the gated producer");
}
