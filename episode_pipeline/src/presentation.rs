// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! CLI-facing formatting (§7): renders a [`Report`] as the
//! `[OK|SKIP|FAIL] <episode_id>: <short reason>` line the spec requires,
//! one per stage, and derives the batch-command exit code from a set of
//! reports.

use crate::application::services::pipeline_executor::{Report, StageResult};
use episode_pipeline_domain::value_objects::StageOutcome;

/// Renders every stage result in `report` as one `[OK|SKIP|FAIL] <id>:
/// <reason>` line.
pub fn format_report(report: &Report) -> Vec<String> {
    report.stages.iter().map(|stage| format_stage_line(&report.episode_id, stage)).collect()
}

fn format_stage_line(episode_id: &str, stage: &StageResult) -> String {
    let marker = match stage.outcome {
        StageOutcome::Success => "OK",
        StageOutcome::Skipped => "SKIP",
        StageOutcome::ReviewPending => "SKIP",
        StageOutcome::Failed => "FAIL",
    };
    format!("[{marker}] {episode_id} ({}): {}", stage.name.as_str(), stage.detail)
}

/// Exit code for a batch command: 0 iff every report succeeded, 1
/// otherwise (§7).
pub fn exit_code(reports: &[Report]) -> i32 {
    if reports.iter().all(|r| r.success) {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use episode_pipeline_domain::value_objects::{Stage, StoppedOn};
    use std::time::Duration;

    fn stage_result(outcome: StageOutcome) -> StageResult {
        StageResult { name: Stage::Download, outcome, elapsed: Duration::from_secs(1), detail: "done".to_string() }
    }

    #[test]
    fn markers_match_outcome() {
        let report = Report {
            episode_id: "ep1".to_string(),
            stages: vec![
                stage_result(StageOutcome::Success),
                stage_result(StageOutcome::Skipped),
                stage_result(StageOutcome::Failed),
            ],
            success: false,
            stopped_on: StoppedOn::Failed,
            total_cost_usd: 0.0,
        };
        let lines = format_report(&report);
        assert!(lines[0].starts_with("[OK]"));
        assert!(lines[1].starts_with("[SKIP]"));
        assert!(lines[2].starts_with("[FAIL]"));
    }

    #[test]
    fn exit_code_is_zero_only_if_all_succeed() {
        let ok = Report {
            episode_id: "ep1".to_string(),
            stages: vec![],
            success: true,
            stopped_on: StoppedOn::Terminal,
            total_cost_usd: 0.0,
        };
        let failed = Report { success: false, ..ok.clone() };
        assert_eq!(exit_code(&[ok.clone()]), 0);
        assert_eq!(exit_code(&[ok, failed]), 1);
    }
}
