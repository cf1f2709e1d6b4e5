// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Chapter document schema v1.0 (§6.2): the chapterize stage's output,
//! consumed by imagegen, tts, and render.

use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCHEMA_VERSION: &str = "1.0";

/// Estimated-duration model used by the narration-duration invariant:
/// roughly 150 words per minute.
const WORDS_PER_SECOND: f64 = 150.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    TitleCard,
    Diagram,
    BRoll,
    TalkingHead,
    ScreenShare,
}

impl VisualKind {
    /// §6.2 invariant: diagram and b-roll visuals must carry an image prompt.
    pub fn requires_image_prompt(self) -> bool {
        matches!(self, VisualKind::Diagram | VisualKind::BRoll)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narration {
    pub text: String,
    pub estimated_duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visual {
    #[serde(rename = "type")]
    pub kind: VisualKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transitions {
    #[serde(rename = "in")]
    pub in_: String,
    pub out: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_id: String,
    pub title: String,
    pub order: u32,
    pub narration: Narration,
    pub visual: Visual,
    #[serde(default)]
    pub overlays: Vec<String>,
    pub transitions: Transitions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDocument {
    pub schema_version: String,
    pub episode_id: String,
    pub title: String,
    pub total_chapters: u32,
    pub estimated_duration_seconds: f64,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChapterValidationError {
    #[error("duplicate chapter_id: {0}")]
    DuplicateChapterId(String),
    #[error("chapter order is not sequential starting at 1: expected {expected}, got {actual}")]
    NonSequentialOrder { expected: u32, actual: u32 },
    #[error("total_chapters ({declared}) does not match chapter count ({actual})")]
    ChapterCountMismatch { declared: u32, actual: u32 },
    #[error("sum of chapter durations ({sum:.1}s) diverges from estimated_duration_seconds ({declared:.1}s) by more than 5s")]
    DurationSumMismatch { declared: f64, sum: f64 },
    #[error("chapter {0} has a diagram/b_roll visual with no image_prompt")]
    MissingImagePrompt(String),
    #[error("chapter {chapter_id} narration duration {actual:.1}s is outside 20% of the word-count estimate {expected:.1}s")]
    NarrationDurationOutOfRange {
        chapter_id: String,
        actual: f64,
        expected: f64,
    },
}

impl ChapterDocument {
    /// Validates the invariants in §6.2: unique ids, sequential order from
    /// 1, duration sum within 5s, image prompts where required, and
    /// per-chapter narration duration within 20% of the word-count estimate.
    pub fn validate(&self) -> Result<(), ChapterValidationError> {
        if self.chapters.len() as u32 != self.total_chapters {
            return Err(ChapterValidationError::ChapterCountMismatch {
                declared: self.total_chapters,
                actual: self.chapters.len() as u32,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for (index, chapter) in self.chapters.iter().enumerate() {
            if !seen.insert(chapter.chapter_id.clone()) {
                return Err(ChapterValidationError::DuplicateChapterId(chapter.chapter_id.clone()));
            }
            let expected_order = index as u32 + 1;
            if chapter.order != expected_order {
                return Err(ChapterValidationError::NonSequentialOrder {
                    expected: expected_order,
                    actual: chapter.order,
                });
            }
            if chapter.visual.kind.requires_image_prompt() && chapter.visual.image_prompt.is_none() {
                return Err(ChapterValidationError::MissingImagePrompt(chapter.chapter_id.clone()));
            }

            let word_count = chapter.narration.text.split_whitespace().count() as f64;
            let expected_duration = word_count / WORDS_PER_SECOND;
            let actual_duration = chapter.narration.estimated_duration_seconds;
            if expected_duration > 0.0 {
                let tolerance = expected_duration * 0.20;
                if (actual_duration - expected_duration).abs() > tolerance {
                    return Err(ChapterValidationError::NarrationDurationOutOfRange {
                        chapter_id: chapter.chapter_id.clone(),
                        actual: actual_duration,
                        expected: expected_duration,
                    });
                }
            }
        }

        let duration_sum: f64 = self.chapters.iter().map(|c| c.narration.estimated_duration_seconds).sum();
        if (duration_sum - self.estimated_duration_seconds).abs() > 5.0 {
            return Err(ChapterValidationError::DurationSumMismatch {
                declared: self.estimated_duration_seconds,
                sum: duration_sum,
            });
        }

        Ok(())
    }

    pub async fn write(&self, path: &Path) -> Result<(), PipelineError> {
        self.validate().map_err(|e| PipelineError::input_invalid(e.to_string()))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub async fn read(path: &Path) -> Result<Self, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let document: ChapterDocument = serde_json::from_slice(&bytes)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: &str, order: u32, words: usize, duration: f64, kind: VisualKind, image_prompt: Option<&str>) -> Chapter {
        Chapter {
            chapter_id: id.to_string(),
            title: format!("Chapter {order}"),
            order,
            narration: Narration {
                text: vec!["word"; words].join(" "),
                estimated_duration_seconds: duration,
            },
            visual: Visual {
                kind,
                description: "a visual".to_string(),
                image_prompt: image_prompt.map(|s| s.to_string()),
            },
            overlays: vec![],
            transitions: Transitions { in_: "fade".to_string(), out: "fade".to_string() },
        }
    }

    fn doc(chapters: Vec<Chapter>) -> ChapterDocument {
        let sum: f64 = chapters.iter().map(|c| c.narration.estimated_duration_seconds).sum();
        ChapterDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            episode_id: "ep123".to_string(),
            title: "Episode".to_string(),
            total_chapters: chapters.len() as u32,
            estimated_duration_seconds: sum,
            chapters,
        }
    }

    #[test]
    fn valid_document_passes() {
        let chapters = vec![
            chapter("ch1", 1, 150, 60.0, VisualKind::TalkingHead, None),
            chapter("ch2", 2, 75, 30.0, VisualKind::Diagram, Some("a flowchart")),
        ];
        assert!(doc(chapters).validate().is_ok());
    }

    #[test]
    fn duplicate_chapter_id_is_rejected() {
        let chapters = vec![
            chapter("ch1", 1, 150, 60.0, VisualKind::TalkingHead, None),
            chapter("ch1", 2, 150, 60.0, VisualKind::TalkingHead, None),
        ];
        assert!(matches!(
            doc(chapters).validate(),
            Err(ChapterValidationError::DuplicateChapterId(_))
        ));
    }

    #[test]
    fn non_sequential_order_is_rejected() {
        let chapters = vec![
            chapter("ch1", 1, 150, 60.0, VisualKind::TalkingHead, None),
            chapter("ch2", 3, 150, 60.0, VisualKind::TalkingHead, None),
        ];
        assert!(matches!(
            doc(chapters).validate(),
            Err(ChapterValidationError::NonSequentialOrder { .. })
        ));
    }

    #[test]
    fn diagram_without_image_prompt_is_rejected() {
        let chapters = vec![chapter("ch1", 1, 150, 60.0, VisualKind::Diagram, None)];
        assert!(matches!(
            doc(chapters).validate(),
            Err(ChapterValidationError::MissingImagePrompt(_))
        ));
    }

    #[test]
    fn narration_duration_far_from_estimate_is_rejected() {
        let chapters = vec![chapter("ch1", 1, 150, 5.0, VisualKind::TalkingHead, None)];
        assert!(matches!(
            doc(chapters).validate(),
            Err(ChapterValidationError::NarrationDurationOutOfRange { .. })
        ));
    }

    #[test]
    fn title_card_and_screen_share_serialize_to_the_documented_wire_names() {
        assert_eq!(serde_json::to_string(&VisualKind::TitleCard).unwrap(), "\"title_card\"");
        assert_eq!(serde_json::to_string(&VisualKind::ScreenShare).unwrap(), "\"screen_share\"");
        assert!(!VisualKind::TitleCard.requires_image_prompt());
        assert!(!VisualKind::ScreenShare.requires_image_prompt());
    }

    #[test]
    fn duration_sum_mismatch_is_rejected() {
        let mut document = doc(vec![chapter("ch1", 1, 150, 60.0, VisualKind::TalkingHead, None)]);
        document.estimated_duration_seconds = 1000.0;
        assert!(matches!(
            document.validate(),
            Err(ChapterValidationError::DurationSumMismatch { .. })
        ));
    }
}
