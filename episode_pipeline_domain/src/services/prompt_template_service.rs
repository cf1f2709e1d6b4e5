// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Frontmatter parsing and body hashing for prompt templates (§4.6).
//!
//! Reading the template file is an infrastructure concern (disk I/O); this
//! service only ever sees a string already in memory, so it stays a
//! synchronous, CPU-bound domain trait — the same split the teacher draws
//! between `ChecksumService` (sync, domain) and its async infrastructure
//! adapters.

use crate::value_objects::ContentHash;
use std::collections::BTreeMap;

/// Frontmatter fields recognized at the top of a prompt template file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFrontmatter {
    pub name: Option<String>,
    pub model: Option<String>,
    /// Remaining `key: value` pairs, including `model_params.*` entries,
    /// kept as raw strings — the application layer decides how to parse
    /// them into `model_params` JSON.
    pub extra: BTreeMap<String, String>,
}

/// Domain service contract for parsing and hashing prompt templates.
///
/// Implementations must be thread-safe (`Send + Sync`) and deterministic:
/// the same raw content always yields the same `(frontmatter, body)` split
/// and the same hash for the same body (§8 "compute_hash of a template
/// with frontmatter equals compute_hash of the same body without
/// frontmatter").
pub trait PromptTemplateService: Send + Sync {
    /// Splits frontmatter from body. Returns `(None, raw)` unchanged when
    /// no frontmatter delimiter is present.
    fn parse(&self, raw: &str) -> (Option<PromptFrontmatter>, String);

    /// Hashes `body`. Idempotent under frontmatter stripping: if `body`
    /// still carries a frontmatter block (e.g. the caller passed raw file
    /// content instead of an already-split body), it is stripped first.
    fn compute_hash(&self, body: &str) -> ContentHash;
}

/// `---`-delimited YAML-like frontmatter, the on-disk convention this
/// pipeline's templates use.
pub struct DelimitedFrontmatterParser;

const DELIMITER: &str = "---";

impl DelimitedFrontmatterParser {
    fn split(raw: &str) -> (Option<&str>, &str) {
        let trimmed_start = raw.trim_start_matches('\u{feff}');
        let Some(rest) = trimmed_start.strip_prefix(DELIMITER) else {
            return (None, raw);
        };
        let rest = rest.strip_prefix('\n').unwrap_or(rest);
        let Some(end) = rest.find("\n---") else {
            return (None, raw);
        };
        let frontmatter = &rest[..end];
        let after = &rest[end + 4..];
        let body = after.strip_prefix('\n').unwrap_or(after);
        (Some(frontmatter), body)
    }

    fn parse_fields(frontmatter: &str) -> PromptFrontmatter {
        let mut meta = PromptFrontmatter::default();
        for line in frontmatter.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_string();
            let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
            match key.as_str() {
                "name" => meta.name = Some(value),
                "model" => meta.model = Some(value),
                _ => {
                    meta.extra.insert(key, value);
                }
            }
        }
        meta
    }
}

impl PromptTemplateService for DelimitedFrontmatterParser {
    fn parse(&self, raw: &str) -> (Option<PromptFrontmatter>, String) {
        let (frontmatter, body) = Self::split(raw);
        (frontmatter.map(Self::parse_fields), body.to_string())
    }

    fn compute_hash(&self, body: &str) -> ContentHash {
        let (_, stripped) = Self::split(body);
        ContentHash::of(stripped.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_model_from_frontmatter() {
        let raw = "---\nname: correct\nmodel: gpt-4o\ntemperature: \"0.2\"\n---\nFix the grammar.\n";
        let parser = DelimitedFrontmatterParser;
        let (meta, body) = parser.parse(raw);
        let meta = meta.expect("frontmatter present");
        assert_eq!(meta.name.as_deref(), Some("correct"));
        assert_eq!(meta.model.as_deref(), Some("gpt-4o"));
        assert_eq!(meta.extra.get("temperature").map(String::as_str), Some("0.2"));
        assert_eq!(body, "Fix the grammar.\n");
    }

    #[test]
    fn returns_no_frontmatter_when_absent() {
        let parser = DelimitedFrontmatterParser;
        let (meta, body) = parser.parse("Fix the grammar.\n");
        assert!(meta.is_none());
        assert_eq!(body, "Fix the grammar.\n");
    }

    #[test]
    fn hash_is_stable_across_frontmatter_presence() {
        let parser = DelimitedFrontmatterParser;
        let with_frontmatter = "---\nname: correct\n---\nFix the grammar.\n";
        let without = "Fix the grammar.\n";
        assert_eq!(parser.compute_hash(with_frontmatter), parser.compute_hash(without));
    }

    #[test]
    fn hash_is_idempotent_on_already_stripped_body() {
        let parser = DelimitedFrontmatterParser;
        let body = "Fix the grammar.\n";
        assert_eq!(parser.compute_hash(body), parser.compute_hash(body));
    }
}
