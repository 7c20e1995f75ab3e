use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

use crate::database::sqlite::models::PortfolioSeed;
use crate::database::sqlite::queries::{
    BlogPostQueries, CertificationQueries, EducationQueries, KnowledgeStateQueries,
    ProjectQueries, SkillQueries, WorkExperienceQueries,
};

#[cfg(test)]
mod tests;

pub mod models;
pub mod queries;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    #[inline]
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.run_migrations().await?;

        Ok(database)
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    #[inline]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("src/database/sqlite/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run schema migration")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    // Generation pointer operations

    #[inline]
    pub async fn current_generation(&self) -> Result<Option<String>> {
        KnowledgeStateQueries::current_generation(&self.pool).await
    }

    #[inline]
    pub async fn set_current_generation(&self, generation: &str) -> Result<()> {
        KnowledgeStateQueries::set_current_generation(&self.pool, generation).await
    }

    /// Insert every record from a portfolio snapshot. Existing rows are kept;
    /// the snapshot is additive, full replacement happens at the chunk level
    /// during ingestion.
    #[inline]
    pub async fn import_seed(&self, seed: &PortfolioSeed) -> Result<usize> {
        for project in &seed.projects {
            ProjectQueries::insert(&self.pool, project).await?;
        }
        for skill in &seed.skills {
            SkillQueries::insert(&self.pool, skill).await?;
        }
        for education in &seed.education {
            EducationQueries::insert(&self.pool, education).await?;
        }
        for work in &seed.work_experience {
            WorkExperienceQueries::insert(&self.pool, work).await?;
        }
        for certification in &seed.certifications {
            CertificationQueries::insert(&self.pool, certification).await?;
        }
        for post in &seed.blog_posts {
            BlogPostQueries::insert(&self.pool, post).await?;
        }

        Ok(seed.record_count())
    }
}
