// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Closed stage identity (§9 redesign flag: "replace string-keyed dispatch
//! with a closed set of tagged variants"), the pipeline-version-2 stage
//! graph (§3.2), and the fixed cascade invalidation map (§4.3).

use super::episode_status::EpisodeStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Download,
    Transcribe,
    Correct,
    ReviewGate1,
    Translate,
    Adapt,
    ReviewGate2,
    Chapterize,
    Imagegen,
    Tts,
    Render,
    ReviewGate3,
    Publish,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        use Stage::*;
        match self {
            Download => "download",
            Transcribe => "transcribe",
            Correct => "correct",
            ReviewGate1 => "review_gate_1",
            Translate => "translate",
            Adapt => "adapt",
            ReviewGate2 => "review_gate_2",
            Chapterize => "chapterize",
            Imagegen => "imagegen",
            Tts => "tts",
            Render => "render",
            ReviewGate3 => "review_gate_3",
            Publish => "publish",
        }
    }

    /// True for the three sentinel stages that suspend the pipeline for
    /// human review instead of producing an artifact (§3.2, GLOSSARY
    /// "Gate").
    pub fn is_review_gate(self) -> bool {
        matches!(self, Stage::ReviewGate1 | Stage::ReviewGate2 | Stage::ReviewGate3)
    }

    /// The producing stage a review gate protects, used by the review
    /// coordinator to look up the gate's artifact and by the gate-revert
    /// map (§4.5).
    pub fn gated_producer(self) -> Option<Stage> {
        match self {
            Stage::ReviewGate1 => Some(Stage::Correct),
            Stage::ReviewGate2 => Some(Stage::Adapt),
            Stage::ReviewGate3 => Some(Stage::Render),
            _ => None,
        }
    }

    /// Inverse of [`Stage::gated_producer`]: the gate that protects this
    /// producing stage, used by the review coordinator to look up the
    /// episode-status revert target for reject/request-changes (§4.5).
    pub fn producing_gate(self) -> Option<Stage> {
        match self {
            Stage::Correct => Some(Stage::ReviewGate1),
            Stage::Adapt => Some(Stage::ReviewGate2),
            Stage::Render => Some(Stage::ReviewGate3),
            _ => None,
        }
    }

    /// Downstream stages this stage's output invalidates on re-run
    /// (§4.3 "Downstream map (fixed)").
    pub fn invalidates(self) -> &'static [Stage] {
        match self {
            Stage::Correct => &[Stage::Translate],
            Stage::Translate => &[Stage::Adapt],
            Stage::Adapt => &[Stage::Chapterize],
            Stage::Chapterize => &[Stage::Imagegen, Stage::Tts],
            Stage::Imagegen => &[Stage::Render],
            Stage::Tts => &[Stage::Render],
            _ => &[],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Stage::*;
        Ok(match s {
            "download" => Download,
            "transcribe" => Transcribe,
            "correct" => Correct,
            "review_gate_1" => ReviewGate1,
            "translate" => Translate,
            "adapt" => Adapt,
            "review_gate_2" => ReviewGate2,
            "chapterize" => Chapterize,
            "imagegen" => Imagegen,
            "tts" => Tts,
            "render" => Render,
            "review_gate_3" => ReviewGate3,
            "publish" => Publish,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown stage: {other}"))),
        })
    }
}

/// One entry of the stage graph: the stage is eligible when the episode is
/// exactly at `required_status` (§3.2).
#[derive(Debug, Clone, Copy)]
pub struct StageGraphEntry {
    pub stage: Stage,
    pub required_status: EpisodeStatus,
}

/// The pipeline-version-2 stage graph, in dispatch order (§3.2).
pub fn stage_graph_v2() -> &'static [StageGraphEntry] {
    use EpisodeStatus::*;
    use Stage::*;
    const GRAPH: &[StageGraphEntry] = &[
        StageGraphEntry { stage: Download, required_status: New },
        StageGraphEntry { stage: Transcribe, required_status: Downloaded },
        StageGraphEntry { stage: Correct, required_status: Transcribed },
        StageGraphEntry { stage: ReviewGate1, required_status: Corrected },
        StageGraphEntry { stage: Translate, required_status: Corrected },
        StageGraphEntry { stage: Adapt, required_status: Translated },
        StageGraphEntry { stage: ReviewGate2, required_status: Adapted },
        StageGraphEntry { stage: Chapterize, required_status: Adapted },
        StageGraphEntry { stage: Imagegen, required_status: Chapterized },
        StageGraphEntry { stage: Tts, required_status: ImagesGenerated },
        StageGraphEntry { stage: Render, required_status: TtsDone },
        StageGraphEntry { stage: ReviewGate3, required_status: Rendered },
        StageGraphEntry { stage: Publish, required_status: Approved },
    ];
    GRAPH
}

/// The status a stage's episode reverts to when its protecting gate is
/// rejected or sent back for changes (§4.5 gate map).
pub fn gate_revert_status(gate: Stage) -> Option<EpisodeStatus> {
    match gate {
        Stage::ReviewGate1 => Some(EpisodeStatus::Transcribed),
        Stage::ReviewGate2 => Some(EpisodeStatus::Translated),
        Stage::ReviewGate3 => Some(EpisodeStatus::TtsDone),
        _ => None,
    }
}

/// The episode status a stage advances to on success. Distinct from
/// `required_status` of the *next* graph entry because review gates don't
/// advance status themselves except `review_gate_3` (§4.5).
pub fn produced_status(stage: Stage) -> Option<EpisodeStatus> {
    use EpisodeStatus::*;
    match stage {
        Stage::Download => Some(Downloaded),
        Stage::Transcribe => Some(Transcribed),
        Stage::Correct => Some(Corrected),
        Stage::ReviewGate1 => None,
        Stage::Translate => Some(Translated),
        Stage::Adapt => Some(Adapted),
        Stage::ReviewGate2 => None,
        Stage::Chapterize => Some(Chapterized),
        Stage::Imagegen => Some(ImagesGenerated),
        Stage::Tts => Some(TtsDone),
        Stage::Render => Some(Rendered),
        Stage::ReviewGate3 => Some(Approved),
        Stage::Publish => Some(Published),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_v2_has_thirteen_entries_in_spec_order() {
        let graph = stage_graph_v2();
        assert_eq!(graph.len(), 13);
        assert_eq!(graph[0].stage, Stage::Download);
        assert_eq!(graph[3].stage, Stage::ReviewGate1);
        assert_eq!(graph[12].stage, Stage::Publish);
        assert_eq!(graph[12].required_status, EpisodeStatus::Approved);
    }

    #[test]
    fn cascade_map_matches_spec_table() {
        assert_eq!(Stage::Correct.invalidates(), &[Stage::Translate]);
        assert_eq!(Stage::Chapterize.invalidates(), &[Stage::Imagegen, Stage::Tts]);
        assert_eq!(Stage::Tts.invalidates(), &[Stage::Render]);
        assert!(Stage::Publish.invalidates().is_empty());
    }

    #[test]
    fn gate_revert_matches_spec_table() {
        assert_eq!(gate_revert_status(Stage::ReviewGate1), Some(EpisodeStatus::Transcribed));
        assert_eq!(gate_revert_status(Stage::ReviewGate2), Some(EpisodeStatus::Translated));
        assert_eq!(gate_revert_status(Stage::ReviewGate3), Some(EpisodeStatus::TtsDone));
    }

    #[test]
    fn stage_name_round_trips() {
        for entry in stage_graph_v2() {
            let parsed: Stage = entry.stage.as_str().parse().unwrap();
            assert_eq!(parsed, entry.stage);
        }
    }
}
