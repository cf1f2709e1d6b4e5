// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Episode status enum (§3.1): a total order used for monotonicity checks,
//! plus two orthogonal terminal statuses (`Failed`, `CostLimit`) that sit
//! outside that order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The linear progression an episode makes through pipeline-version 2,
/// `New -> ... -> Published`, plus the two orthogonal terminal statuses.
///
/// `Ord`/`PartialOrd` reflect position in the *linear* progression only;
/// comparing against `Failed` or `CostLimit` always returns `None` from
/// `partial_cmp`, since those are not part of the monotone order (§8: "for
/// all episodes, `episode.status` transitions monotonically ... except
/// explicit review reverts").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeStatus {
    New,
    Downloaded,
    Transcribed,
    Corrected,
    Translated,
    Adapted,
    Chapterized,
    ImagesGenerated,
    TtsDone,
    Rendered,
    Approved,
    Published,
    Failed,
    CostLimit,
}

impl EpisodeStatus {
    /// Position in the linear progression, or `None` for the orthogonal
    /// terminal statuses.
    fn order_index(self) -> Option<u8> {
        use EpisodeStatus::*;
        match self {
            New => Some(0),
            Downloaded => Some(1),
            Transcribed => Some(2),
            Corrected => Some(3),
            Translated => Some(4),
            Adapted => Some(5),
            Chapterized => Some(6),
            ImagesGenerated => Some(7),
            TtsDone => Some(8),
            Rendered => Some(9),
            Approved => Some(10),
            Published => Some(11),
            Failed | CostLimit => None,
        }
    }

    /// `self` is at or past `other` in the linear progression. Used by the
    /// executor's "already past required_status" skip check (§4.1.2a).
    pub fn is_at_or_past(self, other: EpisodeStatus) -> bool {
        matches!((self.order_index(), other.order_index()), (Some(a), Some(b)) if a >= b)
    }

    pub fn is_before(self, other: EpisodeStatus) -> bool {
        matches!((self.order_index(), other.order_index()), (Some(a), Some(b)) if a < b)
    }

    /// True for `Published`, `Failed`, and `CostLimit` (§3: "progresses
    /// monotonically ... until a terminal status").
    pub fn is_terminal(self) -> bool {
        matches!(self, EpisodeStatus::Published | EpisodeStatus::Failed | EpisodeStatus::CostLimit)
    }

    /// Statuses eligible for batch pick-up (§4.7): every non-terminal,
    /// non-failed status up to and including `Approved`.
    pub fn is_actionable(self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(self) -> &'static str {
        use EpisodeStatus::*;
        match self {
            New => "NEW",
            Downloaded => "DOWNLOADED",
            Transcribed => "TRANSCRIBED",
            Corrected => "CORRECTED",
            Translated => "TRANSLATED",
            Adapted => "ADAPTED",
            Chapterized => "CHAPTERIZED",
            ImagesGenerated => "IMAGES_GENERATED",
            TtsDone => "TTS_DONE",
            Rendered => "RENDERED",
            Approved => "APPROVED",
            Published => "PUBLISHED",
            Failed => "FAILED",
            CostLimit => "COST_LIMIT",
        }
    }
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EpisodeStatus {
    type Err = crate::PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use EpisodeStatus::*;
        Ok(match s {
            "NEW" => New,
            "DOWNLOADED" => Downloaded,
            "TRANSCRIBED" => Transcribed,
            "CORRECTED" => Corrected,
            "TRANSLATED" => Translated,
            "ADAPTED" => Adapted,
            "CHAPTERIZED" => Chapterized,
            "IMAGES_GENERATED" => ImagesGenerated,
            "TTS_DONE" => TtsDone,
            "RENDERED" => Rendered,
            "APPROVED" => Approved,
            "PUBLISHED" => Published,
            "FAILED" => Failed,
            "COST_LIMIT" => CostLimit,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown episode status: {other}"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_order_is_monotonic() {
        assert!(EpisodeStatus::Corrected.is_at_or_past(EpisodeStatus::Transcribed));
        assert!(!EpisodeStatus::Transcribed.is_at_or_past(EpisodeStatus::Corrected));
        assert!(EpisodeStatus::Corrected.is_before(EpisodeStatus::Translated));
    }

    #[test]
    fn terminal_statuses_are_not_actionable() {
        assert!(!EpisodeStatus::Published.is_actionable());
        assert!(!EpisodeStatus::Failed.is_actionable());
        assert!(!EpisodeStatus::CostLimit.is_actionable());
        assert!(EpisodeStatus::Approved.is_actionable());
    }

    #[test]
    fn orthogonal_statuses_do_not_compare() {
        assert!(!EpisodeStatus::Failed.is_at_or_past(EpisodeStatus::New));
        assert!(!EpisodeStatus::New.is_at_or_past(EpisodeStatus::Failed));
    }

    #[test]
    fn round_trips_through_str() {
        for s in [
            EpisodeStatus::New,
            EpisodeStatus::Rendered,
            EpisodeStatus::Published,
            EpisodeStatus::CostLimit,
        ] {
            let parsed: EpisodeStatus = s.as_str().parse().unwrap();
            assert_eq!(parsed, s);
        }
    }
}
