// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Batch selector scoping: `Pending` mode skips episodes with an active
//! review at the stage they'd run next but not episodes gated elsewhere,
//! and `Latest` mode orders and limits by `updated_at`.

mod common;

use common::{build_harness, fixed_now};
use episode_pipeline::application::services::{BatchMode, BatchSelector};
use episode_pipeline_domain::entities::{Episode, ReviewTask};
use episode_pipeline_domain::value_objects::{EpisodeStatus, Stage};
use std::time::Duration;

async fn seed_at(h: &common::Harness, id: &str, status: EpisodeStatus, updated_at: chrono::DateTime<chrono::Utc>) {
    let mut episode = Episode::new(id.to_string(), 2, fixed_now()).unwrap();
    episode.advance_to(status, updated_at).ok();
    h.context.episode_repo.insert(&episode).await.unwrap();
}

async fn seed_active_review(h: &common::Harness, episode_id: &str, stage: Stage) {
    let task = ReviewTask::new(episode_id.to_string(), stage, vec!["artifact.md".into()], None, "hash", None, fixed_now());
    h.context.review_task_repo.insert(&task).await.unwrap();
}

#[tokio::test]
async fn pending_mode_skips_episode_blocked_at_its_own_next_stage() {
    let h = build_harness().await;

    // Runnable: nothing gates it.
    seed_at(&h, "ep-free", EpisodeStatus::New, fixed_now()).await;

    // Blocked: sits at `corrected`, next stage is `review_gate_1`, whose
    // producer is `correct` -- and there's an active task at exactly that
    // (episode, stage) pair.
    seed_at(&h, "ep-blocked", EpisodeStatus::Corrected, fixed_now()).await;
    seed_active_review(&h, "ep-blocked", Stage::Correct).await;

    let selector = BatchSelector::new(h.context.clone(), h.executor.clone());
    let reports = selector.run(BatchMode::Pending, false).await.unwrap();

    assert_eq!(reports.len(), 1, "only the unblocked episode should run");

    let free = h.context.episode_repo.find_by_id(&"ep-free".to_string()).await.unwrap().unwrap();
    assert_eq!(free.status(), EpisodeStatus::Corrected, "ep-free should have progressed past download/transcribe/correct");

    let blocked = h.context.episode_repo.find_by_id(&"ep-blocked".to_string()).await.unwrap().unwrap();
    assert_eq!(blocked.status(), EpisodeStatus::Corrected, "ep-blocked must be left untouched");
}

#[tokio::test]
async fn active_review_at_a_different_stage_or_episode_never_blocks_pickup() {
    let h = build_harness().await;

    // `ep-other-stage` sits at `translated`, so its next stage is `adapt` --
    // an active review at `correct` (a different stage) must not block it.
    seed_at(&h, "ep-other-stage", EpisodeStatus::Translated, fixed_now()).await;
    seed_active_review(&h, "ep-other-stage", Stage::Correct).await;

    // `ep-unrelated` is blocked at `correct`, but the active task belongs to
    // a wholly different episode id and must not leak across episodes.
    seed_at(&h, "ep-unrelated", EpisodeStatus::Corrected, fixed_now()).await;
    seed_active_review(&h, "ep-someone-else", Stage::Correct).await;

    let selector = BatchSelector::new(h.context.clone(), h.executor.clone());
    let reports = selector.run(BatchMode::Pending, false).await.unwrap();

    assert_eq!(reports.len(), 2, "neither episode is actually gated for its own next stage");

    let other_stage = h.context.episode_repo.find_by_id(&"ep-other-stage".to_string()).await.unwrap().unwrap();
    assert_eq!(other_stage.status(), EpisodeStatus::Adapted, "adapt should have run to completion");

    let unrelated = h.context.episode_repo.find_by_id(&"ep-unrelated".to_string()).await.unwrap().unwrap();
    assert_eq!(unrelated.status(), EpisodeStatus::Corrected, "review_gate_1 should now be pending for this one");
}

#[tokio::test]
async fn latest_mode_orders_newest_first_and_respects_the_limit() {
    let h = build_harness().await;
    let base = fixed_now();

    seed_at(&h, "ep-oldest", EpisodeStatus::New, base).await;
    seed_at(&h, "ep-middle", EpisodeStatus::New, base + Duration::from_secs(60)).await;
    seed_at(&h, "ep-newest", EpisodeStatus::New, base + Duration::from_secs(120)).await;

    let latest = h.context.episode_repo.list_latest(2).await.unwrap();
    assert_eq!(latest.len(), 2, "limit must cap the result set");
    assert_eq!(latest[0].id, "ep-newest");
    assert_eq!(latest[1].id, "ep-middle");

    let selector = BatchSelector::new(h.context.clone(), h.executor.clone());
    let reports = selector.run(BatchMode::Latest(2), false).await.unwrap();
    assert_eq!(reports.len(), 2);
}
