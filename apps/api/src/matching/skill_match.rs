//! Skill overlap between a candidate and a job posting.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Share of a job's required skills that the candidate already has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 0 – 100
    pub percentage: u32,
    /// Subset of the job's skills, in the job's order and casing.
    pub matched_skills: Vec<String>,
}

/// Trims and lowercases a skill label. Two labels are the same skill iff their normalized
/// forms are equal.
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Computes how many of `job_skills` appear in `user_skills`, case- and
/// whitespace-insensitively. An empty `job_skills` yields `{0, []}`.
///
/// Duplicates in `job_skills` are counted per occurrence, so a repeated requirement weighs
/// twice as much.
pub fn match_percentage(user_skills: &[String], job_skills: &[String]) -> MatchResult {
    if job_skills.is_empty() {
        return MatchResult::default();
    }

    let normalized_user: HashSet<String> = user_skills.iter().map(|s| normalize_skill(s)).collect();

    let matched_skills: Vec<String> = job_skills
        .iter()
        .filter(|skill| normalized_user.contains(&normalize_skill(skill)))
        .cloned()
        .collect();

    MatchResult {
        percentage: rounded_percentage(matched_skills.len(), job_skills.len()),
        matched_skills,
    }
}

/// `round(part / whole * 100)` with halves rounded up, in integer arithmetic.
fn rounded_percentage(part: usize, whole: usize) -> u32 {
    let scaled = part * 200 + whole;
    (scaled / (2 * whole)) as u32
}
