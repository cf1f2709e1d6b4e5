// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Review coordinator behavior exercised directly: auto-approval of
//! punctuation-only corrections, request-changes cascading `.stale`
//! markers downstream, and the render gate's notes-required rejection
//! rule.

mod common;

use common::{build_harness, fixed_now};
use episode_pipeline_domain::entities::Episode;
use episode_pipeline_domain::value_objects::{EpisodeStatus, ReviewDecisionKind, ReviewTaskStatus, Stage, StageOutcome};

async fn seed_episode(h: &common::Harness, id: &str, status: EpisodeStatus) -> Episode {
    let mut episode = Episode::new(id.to_string(), 2, fixed_now()).unwrap();
    episode.advance_to(status, fixed_now()).ok();
    h.context.episode_repo.insert(&episode).await.unwrap();
    episode
}

#[tokio::test]
async fn punctuation_only_correction_is_auto_approved() {
    let h = build_harness().await;
    let mut episode = seed_episode(&h, "ep-auto", EpisodeStatus::Transcribed).await;
    let layout = h.context.layout("ep-auto");

    tokio::fs::create_dir_all(layout.transcript_clean().parent().unwrap()).await.unwrap();
    tokio::fs::write(layout.transcript_clean(), "Hallo Welt, wie geht es dir").await.unwrap();
    tokio::fs::write(layout.transcript_corrected(), "Hallo Welt. Wie geht es dir").await.unwrap();

    let outcome = h.review_coordinator.encounter_gate(&h.context, &mut episode, Stage::ReviewGate1).await.unwrap();
    assert_eq!(outcome, StageOutcome::Success);

    assert!(h.context.review_task_repo.list_pending().await.unwrap().is_empty());
    let approved = h
        .context
        .review_task_repo
        .find_approved_for_episode_stage(&"ep-auto".to_string(), Stage::Correct)
        .await
        .unwrap();
    assert!(approved.is_some());
}

#[tokio::test]
async fn wording_changes_require_manual_review() {
    let h = build_harness().await;
    let mut episode = seed_episode(&h, "ep-manual", EpisodeStatus::Transcribed).await;
    let layout = h.context.layout("ep-manual");

    tokio::fs::create_dir_all(layout.transcript_clean().parent().unwrap()).await.unwrap();
    tokio::fs::write(layout.transcript_clean(), "the cat sat on the mat").await.unwrap();
    tokio::fs::write(layout.transcript_corrected(), "a dog slept under the table").await.unwrap();

    let outcome = h.review_coordinator.encounter_gate(&h.context, &mut episode, Stage::ReviewGate1).await.unwrap();
    assert_eq!(outcome, StageOutcome::ReviewPending);

    let pending = h.context.review_task_repo.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, ReviewTaskStatus::Pending);
}

#[tokio::test]
async fn request_changes_at_gate_2_cascades_a_stale_marker_onto_chapterize() {
    let h = build_harness().await;
    seed_episode(&h, "ep-cascade", EpisodeStatus::New).await;

    h.executor.run_for_episode("ep-cascade", false).await.unwrap();
    let gate1_task = h.context.review_task_repo.list_pending().await.unwrap()[0].id;
    h.review_coordinator
        .decide(&h.context, &gate1_task, ReviewDecisionKind::Approved, None)
        .await
        .unwrap();
    h.executor.run_for_episode("ep-cascade", false).await.unwrap();

    let pending_at_gate2 = h.context.review_task_repo.list_pending().await.unwrap();
    assert_eq!(pending_at_gate2.len(), 1);
    let gate2_task = pending_at_gate2[0].id;

    h.review_coordinator
        .decide(&h.context, &gate2_task, ReviewDecisionKind::ChangesRequested, Some("tone is off, redo the adaptation".to_string()))
        .await
        .unwrap();

    let episode = h.context.episode_repo.find_by_id(&"ep-cascade".to_string()).await.unwrap().unwrap();
    assert_eq!(episode.status(), EpisodeStatus::Translated, "request-changes reverts past the gated producer");

    let layout = h.context.layout("ep-cascade");
    let chapters_stale = layout.chapters_json().with_extension("json.stale");
    assert!(tokio::fs::metadata(&chapters_stale).await.is_ok(), "chapterize's output must be marked stale");
}

#[tokio::test]
async fn reject_on_render_gate_requires_notes() {
    let h = build_harness().await;
    let mut episode = seed_episode(&h, "ep-render-gate", EpisodeStatus::Rendered).await;
    let layout = h.context.layout("ep-render-gate");
    tokio::fs::create_dir_all(layout.render_draft().parent().unwrap()).await.unwrap();
    tokio::fs::write(layout.render_draft(), b"draft bytes").await.unwrap();

    h.review_coordinator.encounter_gate(&h.context, &mut episode, Stage::ReviewGate3).await.unwrap();
    let task_id = h.context.review_task_repo.list_pending().await.unwrap()[0].id;

    let err = h.review_coordinator.decide(&h.context, &task_id, ReviewDecisionKind::Rejected, None).await.unwrap_err();
    assert!(err.to_string().contains("notes"));

    let task = h
        .review_coordinator
        .decide(&h.context, &task_id, ReviewDecisionKind::Rejected, Some("audio sync is off".to_string()))
        .await
        .unwrap();
    assert_eq!(task.status, ReviewTaskStatus::Rejected);

    let episode = h.context.episode_repo.find_by_id(&"ep-render-gate".to_string()).await.unwrap().unwrap();
    assert_eq!(episode.status(), EpisodeStatus::TtsDone);
}
