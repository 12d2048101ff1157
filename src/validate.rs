//! Input normalization for sync target names and priority codes.
//!
//! Three-tier resolution: exact match → synonym lookup → error with a
//! suggestion picked by edit distance.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// ── Valid value sets ─────────────────────────────────────────

pub static VALID_TARGETS: LazyLock<HashSet<&str>> =
    LazyLock::new(|| ["taskd", "reminders"].into_iter().collect());

pub static VALID_PRIORITIES: LazyLock<HashSet<&str>> =
    LazyLock::new(|| ["h", "m", "l"].into_iter().collect());

// ── Synonym maps ─────────────────────────────────────────────

pub static TARGET_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("reminder", "reminders"),
        ("apple", "reminders"),
        ("apple-reminders", "reminders"),
        ("applereminders", "reminders"),
        ("taskserver", "taskd"),
        ("task-server", "taskd"),
        ("server", "taskd"),
    ]
    .into_iter()
    .collect()
});

pub static PRIORITY_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("high", "h"),
        ("urgent", "h"),
        ("critical", "h"),
        ("medium", "m"),
        ("normal", "m"),
        ("med", "m"),
        ("low", "l"),
        ("minor", "l"),
    ]
    .into_iter()
    .collect()
});

/// Normalize a sync target name via exact match or synonym lookup.
///
/// Returns the canonical lowercase target, or the original input with an
/// optional suggestion.
pub fn normalize_target(input: &str) -> Result<String, (String, Option<String>)> {
    let lower = input.trim().to_lowercase();

    if VALID_TARGETS.contains(lower.as_str()) {
        return Ok(lower);
    }

    if let Some(&canonical) = TARGET_SYNONYMS.get(lower.as_str()) {
        return Ok(canonical.to_string());
    }

    let suggestion = find_closest_match(&lower, &VALID_TARGETS, &TARGET_SYNONYMS);
    Err((input.to_string(), suggestion))
}

/// Normalize a Taskwarrior priority to its one-letter uppercase code.
///
/// Accepts "H"/"M"/"L" in any case and the word forms ("high", "low", ...).
pub fn normalize_priority(input: &str) -> Result<String, (String, Option<String>)> {
    let lower = input.trim().to_lowercase();

    if VALID_PRIORITIES.contains(lower.as_str()) {
        return Ok(lower.to_uppercase());
    }

    if let Some(&code) = PRIORITY_SYNONYMS.get(lower.as_str()) {
        return Ok(code.to_uppercase());
    }

    let suggestion = find_closest_match(&lower, &VALID_PRIORITIES, &PRIORITY_SYNONYMS)
        .map(|s| s.to_uppercase());
    Err((input.to_string(), suggestion))
}

/// Find the closest matching value across valid set and synonyms.
fn find_closest_match(
    input: &str,
    valid: &HashSet<&str>,
    synonyms: &HashMap<&str, &str>,
) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;

    for &v in valid.iter().chain(synonyms.keys()) {
        let dist = levenshtein_distance(input, v);
        if dist <= 3 && best.is_none_or(|(_, d)| dist < d) {
            // Synonyms report what they map to
            let shown = synonyms.get(v).copied().unwrap_or(v);
            best = Some((shown, dist));
        }
    }

    best.map(|(v, _)| v.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("reminders"), Ok("reminders".to_string()));
        assert_eq!(normalize_target("TaskD"), Ok("taskd".to_string()));
        assert_eq!(normalize_target("apple"), Ok("reminders".to_string()));
        assert_eq!(normalize_target("taskserver"), Ok("taskd".to_string()));
    }

    #[test]
    fn test_normalize_target_suggests_closest() {
        let err = normalize_target("remindres").unwrap_err();
        assert_eq!(err.0, "remindres");
        assert_eq!(err.1, Some("reminders".to_string()));

        let err = normalize_target("dropbox-sync-service").unwrap_err();
        assert_eq!(err.1, None);
    }

    #[test]
    fn test_normalize_priority() {
        assert_eq!(normalize_priority("H"), Ok("H".to_string()));
        assert_eq!(normalize_priority("m"), Ok("M".to_string()));
        assert_eq!(normalize_priority("low"), Ok("L".to_string()));
        assert_eq!(normalize_priority("urgent"), Ok("H".to_string()));
        assert!(normalize_priority("someday-maybe").is_err());
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
