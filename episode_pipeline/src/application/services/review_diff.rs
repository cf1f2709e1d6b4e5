// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Word-level diffing for review artifacts (§4.5): the reviewer-facing diff
//! file and the correction auto-approval predicate.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// One substitution in a word diff; `before`/`after` is empty for a pure
/// insertion/deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffEntry {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactDiff {
    pub entries: Vec<DiffEntry>,
}

/// Pairs adjacent delete/insert runs into substitutions; a delete with no
/// following insert (or vice versa) is recorded with the other side empty.
pub fn word_diff_entries(before: &str, after: &str) -> Vec<DiffEntry> {
    let diff = TextDiff::from_words(before, after);
    let mut entries = Vec::new();
    let mut pending_delete = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => pending_delete.push_str(change.value()),
            ChangeTag::Insert => {
                entries.push(DiffEntry { before: std::mem::take(&mut pending_delete), after: change.value().to_string() });
            }
            ChangeTag::Equal => {
                if !pending_delete.is_empty() {
                    entries.push(DiffEntry { before: std::mem::take(&mut pending_delete), after: String::new() });
                }
            }
        }
    }
    if !pending_delete.is_empty() {
        entries.push(DiffEntry { before: pending_delete, after: String::new() });
    }
    entries
}

fn strip_punctuation(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric() || c.is_whitespace()).collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_punctuation_only_change(entry: &DiffEntry) -> bool {
    strip_punctuation(&entry.before) == strip_punctuation(&entry.after)
}

/// §4.5 "Auto-approval (correction stage only)": fewer than 5 changes and
/// every change is punctuation-only. Zero changes trivially satisfies
/// both clauses.
pub fn is_auto_approvable_correction(entries: &[DiffEntry]) -> bool {
    entries.len() < 5 && entries.iter().all(is_punctuation_only_change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_punctuation_only_diff() {
        let entries = word_diff_entries("Hallo Welt, wie geht es dir", "Hallo Welt. Wie geht es dir");
        assert!(is_auto_approvable_correction(&entries));
    }

    #[test]
    fn rejects_wording_changes() {
        let entries = word_diff_entries("the cat sat", "the dog sat");
        assert!(!is_auto_approvable_correction(&entries));
    }

    #[test]
    fn rejects_five_or_more_changes() {
        let entries = word_diff_entries("a, b, c, d, e", "a. b. c. d. e.");
        assert!(entries.len() >= 5);
        assert!(!is_auto_approvable_correction(&entries));
    }

    #[test]
    fn no_changes_is_auto_approvable() {
        assert!(is_auto_approvable_correction(&[]));
    }
}
