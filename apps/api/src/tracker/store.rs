use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::tracker::status::ApplicationStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub status: Option<ApplicationStatus>,
    pub salary: Option<String>,
}

impl NewApplication {
    fn validate(&self) -> Result<(), AppError> {
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("company cannot be empty".to_string()));
        }
        if self.role.trim().is_empty() {
            return Err(AppError::Validation("role cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Blank salary is stored as NULL.
    fn salary(&self) -> Option<&str> {
        self.salary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// The user's applications, most recently applied first.
pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ApplicationRow>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY date_applied DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn add_application(
    pool: &PgPool,
    user_id: Uuid,
    input: NewApplication,
) -> Result<ApplicationRow, AppError> {
    input.validate()?;
    let status = ApplicationStatus::initial(input.status);

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (user_id, company, role, status, salary)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&input.company)
    .bind(&input.role)
    .bind(status.as_str())
    .bind(input.salary())
    .fetch_one(pool)
    .await?;

    info!("Added application {} ({status}) for user {user_id}", row.id);
    Ok(row)
}

/// Moves an application to `next`. Any stage may follow any other, so this is a single
/// scoped update.
pub async fn update_status(
    pool: &PgPool,
    application_id: Uuid,
    user_id: Uuid,
    next: ApplicationStatus,
) -> Result<ApplicationRow, AppError> {
    let updated = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET status = $3, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(user_id)
    .bind(next.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    info!("Application {application_id} moved to {next}");
    Ok(updated)
}

pub async fn delete_application(
    pool: &PgPool,
    application_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
        .bind(application_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Application {application_id} not found"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(company: &str, role: &str, salary: Option<&str>) -> NewApplication {
        NewApplication {
            company: company.to_string(),
            role: role.to_string(),
            status: None,
            salary: salary.map(str::to_string),
        }
    }

    #[test]
    fn test_blank_salary_is_stored_as_null() {
        assert_eq!(input("Acme", "SWE", Some("  ")).salary(), None);
        assert_eq!(input("Acme", "SWE", None).salary(), None);
        assert_eq!(input("Acme", "SWE", Some("$120k")).salary(), Some("$120k"));
    }

    #[test]
    fn test_company_and_role_are_required() {
        assert!(input("", "SWE", None).validate().is_err());
        assert!(input("Acme", " ", None).validate().is_err());
        assert!(input("Acme", "SWE", None).validate().is_ok());
    }

    #[test]
    fn test_request_without_status_starts_on_wishlist() {
        let parsed: NewApplication =
            serde_json::from_str(r#"{"company": "Acme", "role": "SWE"}"#).unwrap();
        assert_eq!(
            ApplicationStatus::initial(parsed.status),
            ApplicationStatus::Wishlist
        );
    }
}
