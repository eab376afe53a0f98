// ABOUTME: JSON candidate extraction and conservative syntactic repair
// ABOUTME: Fence stripping, balanced-brace scanning, trailing-comma and bare-key fixes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Extraction & Repair
//!
//! Model output frequently wraps its JSON in markdown fences, prepends prose,
//! leaves trailing commas or emits bare object keys. Extraction locates the
//! first balanced `{...}` span with a string-aware scanner (a regex would be
//! confused by braces inside string literals); the repair pass applies two
//! conservative syntactic fixes unconditionally.
//!
//! Both passes are idempotent: running them over already-valid JSON yields a
//! string that parses to the identical value.

use serde_json::Value;

use crate::errors::AppError;

/// Remove markdown code-fence lines (```` ``` ```` and ```` ```json ````)
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Locate the first balanced `{...}` span.
///
/// Tracks string literals and escapes so braces inside strings do not count
/// toward nesting depth. Returns `None` when no balanced object exists.
#[must_use]
pub fn extract_json_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Apply conservative syntactic repairs to a JSON candidate.
///
/// Two fixes, applied unconditionally in one string-aware pass:
/// - trailing commas before `}` / `]` are removed
/// - bare object keys are quoted
///
/// String literal content is copied verbatim, which is what makes the pass
/// idempotent on valid input.
#[must_use]
pub fn repair_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut containers: Vec<char> = Vec::new();
    let mut expect_key = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Copy string literals wholesale, including escapes
        if c == '"' {
            out.push(c);
            i += 1;
            while i < chars.len() {
                let s = chars[i];
                out.push(s);
                i += 1;
                if s == '\\' {
                    if i < chars.len() {
                        out.push(chars[i]);
                        i += 1;
                    }
                } else if s == '"' {
                    break;
                }
            }
            expect_key = false;
            continue;
        }

        match c {
            '{' => {
                containers.push('{');
                expect_key = true;
                out.push(c);
                i += 1;
            }
            '[' => {
                containers.push('[');
                expect_key = false;
                out.push(c);
                i += 1;
            }
            '}' | ']' => {
                containers.pop();
                expect_key = false;
                out.push(c);
                i += 1;
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    // Trailing comma: drop it, keep the whitespace that follows
                    i += 1;
                } else {
                    out.push(c);
                    expect_key = matches!(containers.last(), Some('{'));
                    i += 1;
                }
            }
            c if expect_key && (c.is_alphabetic() || c == '_') => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();

                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ':' {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                expect_key = false;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Full extraction pipeline: strip fences, locate the candidate, repair,
/// parse.
///
/// # Errors
///
/// Returns a `Validation` error when no balanced object is present or the
/// repaired candidate still fails to parse.
pub fn extract_and_repair(raw: &str) -> Result<Value, AppError> {
    let stripped = strip_code_fences(raw);
    let candidate = extract_json_candidate(&stripped)
        .ok_or_else(|| AppError::validation("response contains no JSON object"))?;
    let repaired = repair_json(candidate);

    serde_json::from_str(&repaired)
        .map_err(|err| AppError::validation(format!("JSON candidate failed to parse: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_extracts() {
        let raw = "Here is your plan:\n```json\n{\"name\": \"Push Day\"}\n```\nEnjoy!";
        let value = extract_and_repair(raw).unwrap();
        assert_eq!(value["name"], "Push Day");
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scanner() {
        let raw = r#"{"description": "use {braces} and \"quotes\" freely", "n": 1} trailing"#;
        let candidate = extract_json_candidate(raw).unwrap();
        let value: Value = serde_json::from_str(candidate).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn trailing_commas_are_removed() {
        let raw = r#"{"items": [1, 2, 3,], "name": "x",}"#;
        let value: Value = serde_json::from_str(&repair_json(raw)).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn bare_keys_are_quoted() {
        let raw = r#"{name: "Squat", sets: 3, nested: {reps_per_set: 10}}"#;
        let value: Value = serde_json::from_str(&repair_json(raw)).unwrap();
        assert_eq!(value["name"], "Squat");
        assert_eq!(value["nested"]["reps_per_set"], 10);
    }

    #[test]
    fn repair_is_idempotent_on_valid_json() {
        let cases = [
            r#"{"a": 1, "b": [true, null], "c": {"d": "x"}}"#,
            r#"{"text": "commas, and ,] and ,} inside strings"}"#,
            r#"{"weird": "a {bare_looking: thing} in a string"}"#,
            r#"{"esc": "quote \" backslash \\ end"}"#,
        ];
        for case in cases {
            let once = repair_json(case);
            let twice = repair_json(&once);
            let original: Value = serde_json::from_str(case).unwrap();
            let repaired: Value = serde_json::from_str(&twice).unwrap();
            assert_eq!(original, repaired, "repair corrupted: {case}");
        }
    }

    #[test]
    fn unbalanced_input_yields_validation_error() {
        let err = extract_and_repair("no json here at all").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::Validation);

        let err = extract_and_repair(r#"{"open": ["#).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::Validation);
    }
}
