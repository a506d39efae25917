use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{AppliedEntry, ApplicationRow, DEFAULT_STATUS};
use crate::models::internship::{Internship, InternshipFields, NewInternship};
use crate::models::user::{NewUser, ProfileUpdate, Role, User};
use crate::store::{AppendOutcome, Store};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    skills: Vec<String>,
    interests: Vec<String>,
    education: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("user {}: {e}", row.id)))?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            skills: row.skills,
            interests: row.interests,
            education: row.education,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, skills, interests)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.skills)
        .bind(&user.interests)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("User already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

        row.try_into()
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                name        = COALESCE($2, name),
                skills      = COALESCE($3, skills),
                interests   = COALESCE($4, interests),
                education   = COALESCE($5, education),
                description = COALESCE($6, description),
                updated_at  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.skills)
        .bind(update.interests)
        .bind(update.education)
        .bind(update.description)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn list_internships(&self) -> Result<Vec<Internship>, AppError> {
        Ok(sqlx::query_as::<_, Internship>(
            "SELECT * FROM internships ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_internship(&self, id: Uuid) -> Result<Option<Internship>, AppError> {
        Ok(
            sqlx::query_as::<_, Internship>("SELECT * FROM internships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn internships_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Internship>, AppError> {
        Ok(
            sqlx::query_as::<_, Internship>("SELECT * FROM internships WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn create_internship(&self, internship: NewInternship) -> Result<Internship, AppError> {
        let created = sqlx::query_as::<_, Internship>(
            r#"
            INSERT INTO internships
                (id, title, company, location, required_skills, description, duration, stipend)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&internship.title)
        .bind(&internship.company)
        .bind(&internship.location)
        .bind(&internship.required_skills)
        .bind(&internship.description)
        .bind(&internship.duration)
        .bind(&internship.stipend)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted internship {} ({})", created.id, created.title);
        Ok(created)
    }

    async fn update_internship(
        &self,
        id: Uuid,
        fields: InternshipFields,
    ) -> Result<Option<Internship>, AppError> {
        Ok(sqlx::query_as::<_, Internship>(
            r#"
            UPDATE internships SET
                title           = COALESCE($2, title),
                company         = COALESCE($3, company),
                location        = COALESCE($4, location),
                required_skills = COALESCE($5, required_skills),
                description     = COALESCE($6, description),
                duration        = COALESCE($7, duration),
                stipend         = COALESCE($8, stipend),
                updated_at      = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.company)
        .bind(fields.location)
        .bind(fields.required_skills)
        .bind(fields.description)
        .bind(fields.duration)
        .bind(fields.stipend)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_internship(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM internships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn applied_entries(&self, user_id: Uuid) -> Result<Vec<AppliedEntry>, AppError> {
        Ok(sqlx::query_as::<_, AppliedEntry>(
            r#"
            SELECT id, internship_id, applied_at, status
            FROM applications
            WHERE user_id = $1
            ORDER BY applied_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn append_application(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> Result<AppendOutcome, AppError> {
        // The unique (user_id, internship_id) constraint makes this a single
        // conditional append; concurrent duplicates lose the race here.
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO applications (id, user_id, internship_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, internship_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(internship_id)
        .bind(DEFAULT_STATUS)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match inserted {
            Some(_) => AppendOutcome::Appended,
            None => AppendOutcome::AlreadyApplied,
        })
    }

    async fn application_rows(&self) -> Result<Vec<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT u.name       AS student_name,
                   u.email      AS student_email,
                   i.title      AS role,
                   i.company    AS company,
                   u.email      AS contact,
                   a.applied_at AS date,
                   a.status     AS status
            FROM users u
            JOIN applications a ON a.user_id = u.id
            JOIN internships i  ON i.id = a.internship_id
            ORDER BY u.created_at ASC, a.applied_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
