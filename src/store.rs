// src/store.rs
use crate::types::EnrichedJobRecord;
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Outcome of one batch write. `duplicates` counts records whose identity
/// already existed; existing rows are left untouched.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub inserted: u64,
    pub duplicates: u64,
}

pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub async fn connect(database_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        info!("Database connection pool initialized: {}", database_url);

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    #[cfg(test)]
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                identity TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                source TEXT NOT NULL,
                url TEXT NOT NULL,
                remote BOOLEAN NOT NULL DEFAULT FALSE,
                description TEXT NOT NULL,
                experience_required TEXT NOT NULL,
                job_type TEXT NOT NULL,
                skills TEXT NOT NULL,
                requirements TEXT NOT NULL,
                salary_min INTEGER NOT NULL,
                salary_max INTEGER NOT NULL,
                salary_currency TEXT NOT NULL,
                scraped_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_jobs_source
            ON jobs(source);
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Insert a batch, skipping records whose identity is already stored.
    pub async fn upsert_batch(&self, records: &[EnrichedJobRecord]) -> Result<StoreReport> {
        let mut report = StoreReport::default();
        let now = Utc::now();

        for record in records {
            let skills = serde_json::to_string(&record.skills)?;
            let requirements = serde_json::to_string(&record.requirements)?;

            let result = sqlx::query(
                r#"
                INSERT INTO jobs (
                    identity, title, company, location, source, url, remote,
                    description, experience_required, job_type, skills,
                    requirements, salary_min, salary_max, salary_currency,
                    scraped_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(identity) DO NOTHING
                "#,
            )
            .bind(record.identity_key())
            .bind(&record.raw.title)
            .bind(&record.raw.company)
            .bind(&record.raw.location)
            .bind(&record.raw.source)
            .bind(&record.raw.url)
            .bind(record.raw.remote)
            .bind(&record.description)
            .bind(&record.experience_required)
            .bind(&record.job_type)
            .bind(skills)
            .bind(requirements)
            .bind(record.salary.min)
            .bind(record.salary.max)
            .bind(&record.salary.currency)
            .bind(now)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() > 0 {
                report.inserted += 1;
            } else {
                report.duplicates += 1;
            }
        }

        info!(
            "Stored batch: {} inserted, {} already present",
            report.inserted, report.duplicates
        );
        Ok(report)
    }

    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
