// Skill matching between candidates and job postings.
// Pure and synchronous: recomputed on every request, never cached.

pub mod handlers;
pub mod skill_match;

pub use skill_match::{match_percentage, normalize_skill, MatchResult};
