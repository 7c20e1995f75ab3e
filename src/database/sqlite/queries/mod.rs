#[cfg(test)]
mod tests;

use super::models::{
    BlogPost, Certification, Education, NewBlogPost, NewCertification, NewEducation, NewProject,
    NewSkill, NewWorkExperience, Project, Skill, WorkExperience,
};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

pub struct ProjectQueries;

impl ProjectQueries {
    /// List all projects in display order
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Project>> {
        sqlx::query_as::<_, Project>(
            "SELECT id, title, description, full_description, tags, live_link, github_link, display_order
             FROM projects ORDER BY display_order, id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list projects")
    }

    #[inline]
    pub async fn insert(pool: &SqlitePool, new: &NewProject) -> Result<i64> {
        let tags = serde_json::to_string(&new.tags).context("Failed to serialize project tags")?;
        let id = sqlx::query(
            "INSERT INTO projects (title, description, full_description, tags, live_link, github_link, display_order)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.full_description)
        .bind(tags)
        .bind(&new.live_link)
        .bind(&new.github_link)
        .bind(new.display_order)
        .execute(pool)
        .await
        .context("Failed to insert project")?
        .last_insert_rowid();

        Ok(id)
    }
}

pub struct SkillQueries;

impl SkillQueries {
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Skill>> {
        sqlx::query_as::<_, Skill>("SELECT id, name, display_order FROM skills ORDER BY display_order, id")
            .fetch_all(pool)
            .await
            .context("Failed to list skills")
    }

    #[inline]
    pub async fn insert(pool: &SqlitePool, new: &NewSkill) -> Result<i64> {
        let id = sqlx::query("INSERT INTO skills (name, display_order) VALUES (?, ?)")
            .bind(&new.name)
            .bind(new.display_order)
            .execute(pool)
            .await
            .context("Failed to insert skill")?
            .last_insert_rowid();

        Ok(id)
    }
}

pub struct EducationQueries;

impl EducationQueries {
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Education>> {
        sqlx::query_as::<_, Education>(
            "SELECT id, title, period, description, display_order
             FROM education ORDER BY display_order, id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list education entries")
    }

    #[inline]
    pub async fn insert(pool: &SqlitePool, new: &NewEducation) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO education (title, period, description, display_order) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.period)
        .bind(&new.description)
        .bind(new.display_order)
        .execute(pool)
        .await
        .context("Failed to insert education entry")?
        .last_insert_rowid();

        Ok(id)
    }
}

pub struct WorkExperienceQueries;

impl WorkExperienceQueries {
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<WorkExperience>> {
        sqlx::query_as::<_, WorkExperience>(
            "SELECT id, title, organisation, period, description, display_order
             FROM work_experience ORDER BY display_order, id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list work experience entries")
    }

    #[inline]
    pub async fn insert(pool: &SqlitePool, new: &NewWorkExperience) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO work_experience (title, organisation, period, description, display_order)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.organisation)
        .bind(&new.period)
        .bind(&new.description)
        .bind(new.display_order)
        .execute(pool)
        .await
        .context("Failed to insert work experience entry")?
        .last_insert_rowid();

        Ok(id)
    }
}

pub struct CertificationQueries;

impl CertificationQueries {
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Certification>> {
        sqlx::query_as::<_, Certification>(
            "SELECT id, name, issuer, date, description, credential_url, display_order
             FROM certifications ORDER BY display_order, id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list certifications")
    }

    #[inline]
    pub async fn insert(pool: &SqlitePool, new: &NewCertification) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO certifications (name, issuer, date, description, credential_url, display_order)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.issuer)
        .bind(&new.date)
        .bind(&new.description)
        .bind(&new.credential_url)
        .bind(new.display_order)
        .execute(pool)
        .await
        .context("Failed to insert certification")?
        .last_insert_rowid();

        Ok(id)
    }
}

pub struct BlogPostQueries;

impl BlogPostQueries {
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(
            "SELECT id, title, excerpt, date, read_time, url, display_order
             FROM blog_posts ORDER BY display_order, id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list blog posts")
    }

    #[inline]
    pub async fn insert(pool: &SqlitePool, new: &NewBlogPost) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO blog_posts (title, excerpt, date, read_time, url, display_order)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.excerpt)
        .bind(&new.date)
        .bind(&new.read_time)
        .bind(&new.url)
        .bind(new.display_order)
        .execute(pool)
        .await
        .context("Failed to insert blog post")?
        .last_insert_rowid();

        Ok(id)
    }
}

pub struct KnowledgeStateQueries;

impl KnowledgeStateQueries {
    /// Read the generation pointer that search queries filter on
    #[inline]
    pub async fn current_generation(pool: &SqlitePool) -> Result<Option<String>> {
        let row: (Option<String>,) =
            sqlx::query_as("SELECT current_generation FROM knowledge_state WHERE id = 1")
                .fetch_one(pool)
                .await
                .context("Failed to read knowledge state")?;

        Ok(row.0)
    }

    /// Flip the generation pointer. A single UPDATE, so readers observe
    /// either the old generation or the new one, never a mix.
    #[inline]
    pub async fn set_current_generation(pool: &SqlitePool, generation: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE knowledge_state SET current_generation = ?, updated_at = ? WHERE id = 1")
            .bind(generation)
            .bind(now)
            .execute(pool)
            .await
            .context("Failed to update knowledge state")?;

        debug!("Knowledge-base generation pointer set to {}", generation);
        Ok(())
    }
}
