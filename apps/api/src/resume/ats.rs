//! ATS score — a 0–100 completeness/quality estimate for a resume.
//!
//! Category maxima: personal info 20, summary 15, experience 25, education 15, skills 15,
//! projects + certifications 10. They sum to exactly 100.
//!
//! Always computed from scratch over the whole document. Never updated incrementally.

use serde::Serialize;

use crate::models::resume::ResumeDocument;

const PERSONAL_INFO_POINTS: f64 = 20.0;

const SUMMARY_TIERS: &[(usize, f64)] = &[(50, 15.0), (30, 10.0), (15, 5.0)];

const EXPERIENCE_POINTS_PER_ENTRY: f64 = 5.0;
const EXPERIENCE_ENTRY_CAP: f64 = 15.0;
const DETAILED_POINTS_PER_ENTRY: f64 = 2.0;
const DETAILED_CAP: f64 = 10.0;
/// Descriptions longer than this many characters count as "detailed".
const DETAILED_MIN_CHARS: usize = 50;

const EDUCATION_POINTS_PER_ENTRY: f64 = 7.5;
const EDUCATION_CAP: f64 = 15.0;

const SKILL_POINTS_PER_ENTRY: f64 = 1.5;
const SKILLS_CAP: f64 = 15.0;

const EXTRA_POINTS_PER_ENTRY: f64 = 2.5;
const EXTRAS_CAP: f64 = 10.0;

const MAX_SCORE: f64 = 100.0;

/// Per-category points before rounding, plus the rounded total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsBreakdown {
    pub personal_info: f64,
    pub summary: f64,
    pub experience: f64,
    pub education: f64,
    pub skills: f64,
    pub extras: f64,
    pub total: u32,
}

/// Scores a resume. See the module docs for the weights.
pub fn score(resume: &ResumeDocument) -> u32 {
    breakdown(resume).total
}

pub fn breakdown(resume: &ResumeDocument) -> AtsBreakdown {
    let personal_info = personal_info_points(resume);
    let summary = summary_points(&resume.summary);
    let experience = experience_points(resume);
    let education = capped(resume.education.len(), EDUCATION_POINTS_PER_ENTRY, EDUCATION_CAP);
    let skills = capped(resume.skills.len(), SKILL_POINTS_PER_ENTRY, SKILLS_CAP);
    let extras = capped(
        resume.projects.len() + resume.certifications.len(),
        EXTRA_POINTS_PER_ENTRY,
        EXTRAS_CAP,
    );

    let sum = personal_info + summary + experience + education + skills + extras;
    let total = sum.min(MAX_SCORE).round() as u32;

    AtsBreakdown {
        personal_info,
        summary,
        experience,
        education,
        skills,
        extras,
        total,
    }
}

fn personal_info_points(resume: &ResumeDocument) -> f64 {
    let filled = resume.personal_info.filled_count() as f64;
    let fields = crate::models::resume::PersonalInfo::FIELD_COUNT as f64;
    (filled / fields) * PERSONAL_INFO_POINTS
}

fn summary_points(summary: &str) -> f64 {
    if summary.is_empty() {
        return 0.0;
    }
    let words = summary.split_whitespace().count();
    SUMMARY_TIERS
        .iter()
        .find(|(min_words, _)| words >= *min_words)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

fn experience_points(resume: &ResumeDocument) -> f64 {
    let entries = capped(
        resume.experience.len(),
        EXPERIENCE_POINTS_PER_ENTRY,
        EXPERIENCE_ENTRY_CAP,
    );
    let detailed = resume
        .experience
        .iter()
        .filter(|e| e.description.chars().count() > DETAILED_MIN_CHARS)
        .count();
    entries + capped(detailed, DETAILED_POINTS_PER_ENTRY, DETAILED_CAP)
}

fn capped(count: usize, per_entry: f64, cap: f64) -> f64 {
    (count as f64 * per_entry).min(cap)
}
