// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Composition root: wires settings, the SQLite store, the driver
//! adapters, and the application services into a [`PipelineContext`],
//! then dispatches the validated CLI command into the matching use case
//! and renders the result (§4.9, §7).

use episode_pipeline::application::clock::SystemClock;
use episode_pipeline::application::commands::{
    ListReviewTasksCommand, ReviewDecisionCommand, RunBatchCommand, RunEpisodeCommand,
};
use episode_pipeline::application::services::{CascadeEngine, PipelineExecutor, PromptRegistry, ReviewCoordinator};
use episode_pipeline::application::stages::{all_stage_modules, PipelineContext};
use episode_pipeline::application::use_cases::UseCases;
use episode_pipeline::infrastructure::config::PipelineSettings;
use episode_pipeline::infrastructure::drivers::imagegen::OpenAiImageGenDriver;
use episode_pipeline::infrastructure::drivers::llm::OpenAiLlmDriver;
use episode_pipeline::infrastructure::drivers::media::FfmpegMediaDriver;
use episode_pipeline::infrastructure::drivers::publish::YoutubePublishDriver;
use episode_pipeline::infrastructure::drivers::tts::OpenAiTtsDriver;
use episode_pipeline::infrastructure::logging::init_tracing;
use episode_pipeline::infrastructure::repositories::{
    schema, SqliteContentArtifactRepository, SqliteEpisodeRepository, SqliteMediaAssetRepository, SqlitePipelineRunRepository,
    SqlitePromptVersionRepository, SqliteReviewDecisionRepository, SqliteReviewTaskRepository,
};
use episode_pipeline::presentation;
use episode_pipeline_bootstrap::cli::{ValidatedCli, ValidatedCommand};
use episode_pipeline_bootstrap::{result_to_exit_code, ExitCode};
use episode_pipeline_domain::value_objects::ReviewTaskId;
use episode_pipeline_domain::PipelineError;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let validated = match episode_pipeline_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("argument error: {e}");
            return std::process::ExitCode::from(ExitCode::UsageError.as_i32() as u8);
        }
    };

    if let Err(e) = init_tracing(validated.verbose) {
        eprintln!("warning: failed to install tracing subscriber: {e}");
    }

    let exit_code = result_to_exit_code(run(validated).await);
    std::process::ExitCode::from(exit_code.as_i32() as u8)
}

async fn run(cli: ValidatedCli) -> Result<(), PipelineError> {
    let config_path = cli.config.as_ref().map(|p| p.to_string_lossy().into_owned());
    let environment = std::env::var("EPISODE_PIPELINE_ENV").unwrap_or_else(|_| "development".to_string());
    let mut settings = PipelineSettings::load(&environment, config_path.as_deref())?;
    settings.dry_run = settings.dry_run || cli.dry_run;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .map_err(|e| PipelineError::database_error(e.to_string()))?;
    schema::ensure_schema(&pool).await.map_err(|e| PipelineError::database_error(e.to_string()))?;

    let clock = Arc::new(SystemClock);
    let dry_run = settings.dry_run;

    let context = Arc::new(PipelineContext {
        settings: Arc::new(settings.clone()),
        clock: clock.clone(),
        cascade: Arc::new(CascadeEngine::new(clock.clone())),
        prompt_registry: Arc::new(PromptRegistry::new(Arc::new(SqlitePromptVersionRepository::new(pool.clone())), clock.clone())),
        episode_repo: Arc::new(SqliteEpisodeRepository::new(pool.clone())),
        run_repo: Arc::new(SqlitePipelineRunRepository::new(pool.clone())),
        artifact_repo: Arc::new(SqliteContentArtifactRepository::new(pool.clone())),
        prompt_repo: Arc::new(SqlitePromptVersionRepository::new(pool.clone())),
        review_task_repo: Arc::new(SqliteReviewTaskRepository::new(pool.clone())),
        review_decision_repo: Arc::new(SqliteReviewDecisionRepository::new(pool.clone())),
        media_repo: Arc::new(SqliteMediaAssetRepository::new(pool.clone())),
        llm: Arc::new(OpenAiLlmDriver::from_env(dry_run)?),
        imagegen: Arc::new(OpenAiImageGenDriver::from_env(settings.imagegen.model.clone(), dry_run)?),
        tts: Arc::new(OpenAiTtsDriver::from_env(dry_run)?),
        media: Arc::new(FfmpegMediaDriver::new(dry_run)),
        publish: Arc::new(YoutubePublishDriver::from_env(dry_run)?),
    });

    let review_coordinator = Arc::new(ReviewCoordinator::new());
    let executor = Arc::new(PipelineExecutor::new(context.clone(), review_coordinator.clone(), all_stage_modules()));
    let use_cases = UseCases::new(context, executor, review_coordinator);

    dispatch(&use_cases, cli.command).await
}

async fn dispatch(use_cases: &UseCases, command: ValidatedCommand) -> Result<(), PipelineError> {
    match command {
        ValidatedCommand::Run { episode, force } => {
            let report = use_cases.run_episode.execute(RunEpisodeCommand::new(episode).with_force(force)).await?;
            for line in presentation::format_report(&report) {
                println!("{line}");
            }
            if !report.success {
                return Err(PipelineError::internal_error("episode run did not complete successfully"));
            }
            Ok(())
        }
        ValidatedCommand::RunBatchPending { force } => run_batch(use_cases, RunBatchCommand::pending().with_force(force)).await,
        ValidatedCommand::RunBatchLatest { limit, force } => run_batch(use_cases, RunBatchCommand::latest(limit).with_force(force)).await,
        ValidatedCommand::ReviewApprove { task_id } => {
            let command = ReviewDecisionCommand::Approve { review_task_id: parse_review_task_id(&task_id)? };
            let task = use_cases.review_decisions.execute(command).await?;
            println!("review task {} -> {:?}", task.id, task.status);
            Ok(())
        }
        ValidatedCommand::ReviewReject { task_id, notes } => {
            let command = ReviewDecisionCommand::Reject { review_task_id: parse_review_task_id(&task_id)?, notes };
            let task = use_cases.review_decisions.execute(command).await?;
            println!("review task {} -> {:?}", task.id, task.status);
            Ok(())
        }
        ValidatedCommand::ReviewRequestChanges { task_id, notes } => {
            let command = ReviewDecisionCommand::RequestChanges { review_task_id: parse_review_task_id(&task_id)?, notes };
            let task = use_cases.review_decisions.execute(command).await?;
            println!("review task {} -> {:?}", task.id, task.status);
            Ok(())
        }
        ValidatedCommand::ListReviewTasks => {
            let tasks = use_cases.list_review_tasks.execute(ListReviewTasksCommand).await?;
            if tasks.is_empty() {
                println!("no review tasks pending");
            }
            for task in tasks {
                println!("{} | {} | {:?} | {}", task.id, task.episode_id, task.stage, task.artifact_hash);
            }
            Ok(())
        }
    }
}

async fn run_batch(use_cases: &UseCases, command: RunBatchCommand) -> Result<(), PipelineError> {
    let reports = use_cases.run_batch.execute(command).await?;
    for report in &reports {
        for line in presentation::format_report(report) {
            println!("{line}");
        }
    }
    if presentation::exit_code(&reports) != 0 {
        return Err(PipelineError::internal_error("one or more episodes in the batch did not complete successfully"));
    }
    Ok(())
}

fn parse_review_task_id(raw: &str) -> Result<ReviewTaskId, PipelineError> {
    raw.parse().map_err(|_| PipelineError::input_invalid(format!("invalid review task id: {raw}")))
}
