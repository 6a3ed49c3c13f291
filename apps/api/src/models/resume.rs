use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Fresh identifier for a resume list entry. Never reused once assigned.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

impl PersonalInfo {
    pub const FIELD_COUNT: usize = 6;

    pub fn fields(&self) -> [&str; Self::FIELD_COUNT] {
        [
            self.full_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.location.as_str(),
            self.linkedin.as_str(),
            self.website.as_str(),
        ]
    }

    pub fn filled_count(&self) -> usize {
        self.fields().iter().filter(|f| !f.is_empty()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub location: String,
    pub graduation_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
}

/// The resume as edited by the candidate and stored as JSONB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub certifications: Vec<CertificationEntry>,
    pub projects: Vec<ProjectEntry>,
}

impl ResumeDocument {
    /// Makes every list entry id present and unique across all four lists. Blank ids and
    /// repeats of an id seen earlier get a fresh one; the first holder keeps its id.
    /// Returns how many ids were assigned.
    pub fn assign_entry_ids(&mut self) -> usize {
        let ids = self
            .experience
            .iter_mut()
            .map(|e| &mut e.id)
            .chain(self.education.iter_mut().map(|e| &mut e.id))
            .chain(self.certifications.iter_mut().map(|e| &mut e.id))
            .chain(self.projects.iter_mut().map(|e| &mut e.id));

        let mut seen: HashSet<String> = HashSet::new();
        let mut assigned = 0;
        for id in ids {
            if id.trim().is_empty() || seen.contains(id.as_str()) {
                *id = new_entry_id();
                assigned += 1;
            }
            seen.insert(id.clone());
        }
        assigned
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: Json<ResumeDocument>,
    pub ats_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
