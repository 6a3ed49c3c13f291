use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, ResumeRow};
use crate::resume::ats;

#[derive(Debug, Serialize)]
pub struct SavedResume {
    pub resume_id: Uuid,
    pub ats_score: u32,
    /// The stored document, including any entry ids assigned during the save.
    pub content: ResumeDocument,
}

/// Gives new and duplicated entries fresh ids and scores the document. The score always reflects the whole
/// document as saved.
pub fn prepare_for_save(mut content: ResumeDocument) -> (ResumeDocument, u32) {
    content.assign_entry_ids();
    let score = ats::score(&content);
    (content, score)
}

/// Upserts the user's single resume with a freshly computed ATS score, then mirrors the
/// resume's skills onto the profile. The insert selects from `profiles`, so a user without a
/// profile writes nothing and gets `NotFound`.
pub async fn save_resume(
    pool: &PgPool,
    user_id: Uuid,
    content: ResumeDocument,
) -> Result<SavedResume, AppError> {
    let (content, ats_score) = prepare_for_save(content);

    let resume_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO resumes (user_id, content, ats_score)
        SELECT id, $2, $3 FROM profiles WHERE id = $1
        ON CONFLICT (user_id) DO UPDATE
            SET content = EXCLUDED.content,
                ats_score = EXCLUDED.ats_score,
                updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(Json(&content))
    .bind(ats_score as i32)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| profile_not_found(user_id))?;

    sqlx::query("UPDATE profiles SET skills = $1, updated_at = NOW() WHERE id = $2")
        .bind(&content.skills)
        .bind(user_id)
        .execute(pool)
        .await?;

    info!("Saved resume {resume_id} for user {user_id} (ATS score {ats_score})");

    Ok(SavedResume {
        resume_id,
        ats_score,
        content,
    })
}

fn profile_not_found(user_id: Uuid) -> AppError {
    AppError::NotFound(format!("Profile {user_id} not found"))
}

pub async fn load_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(resume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, PersonalInfo};

    #[test]
    fn test_prepare_assigns_ids_and_scores() {
        let content = ResumeDocument {
            personal_info: PersonalInfo {
                full_name: "Linus".to_string(),
                email: "l@example.com".to_string(),
                phone: "1".to_string(),
                location: "Portland".to_string(),
                linkedin: "in/linus".to_string(),
                website: "kernel.org".to_string(),
            },
            experience: vec![ExperienceEntry::default()],
            ..Default::default()
        };

        let (saved, score) = prepare_for_save(content);

        assert!(!saved.experience[0].id.is_empty());
        // 20 personal + 5 for one experience entry
        assert_eq!(score, 25);
    }

    #[test]
    fn test_prepare_overwrites_nothing_but_missing_ids() {
        let content = ResumeDocument {
            experience: vec![ExperienceEntry {
                id: "exp-1".to_string(),
                description: "short".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let (saved, _) = prepare_for_save(content.clone());
        assert_eq!(saved, content);
    }

    #[test]
    fn test_prepare_gives_copied_entries_distinct_ids() {
        let copied = ExperienceEntry {
            id: "dup".to_string(),
            title: "Engineer".to_string(),
            ..Default::default()
        };
        let content = ResumeDocument {
            experience: vec![copied.clone(), copied],
            ..Default::default()
        };

        let (saved, _) = prepare_for_save(content);

        assert_eq!(saved.experience[0].id, "dup");
        assert!(!saved.experience[1].id.is_empty());
        assert_ne!(saved.experience[1].id, "dup");
        assert_eq!(saved.experience[1].title, "Engineer");
    }

    #[test]
    fn test_missing_profile_is_not_found() {
        use axum::{http::StatusCode, response::IntoResponse};

        let user_id = Uuid::new_v4();
        let err = profile_not_found(user_id);
        assert!(err.to_string().contains(&user_id.to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
