//! Vector store client: chunking, embedding, tenant-scoped storage and
//! similarity search for resumes and jobs, plus the append-only activity log.
//!
//! Tenant isolation is enforced here, at query construction: every statement
//! that touches a tenant-owned table binds `owner_id` in its WHERE clause or
//! writes it into the inserted row. No caller can construct a cross-tenant
//! read through this module.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod cache;
pub mod chunk;
pub mod embed;
pub mod similarity;

use crate::models::activity::{ActivityKind, ActivityRecord, DashboardStats};
use crate::models::job::{JobDefinition, JobFilters, JobMatch, NewJob};
use crate::models::resume::{ResumeDocument, ResumeMatch};
pub use embed::{EmbeddingClient, RetrievalError};
use similarity::{cosine_similarity, rank_documents, ChunkHit};

/// Activity scores at or above this count as a "high match" on the dashboard.
const HIGH_MATCH_SCORE: i32 = 80;

/// Outcome of storing a resume document.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub resume_id: Uuid,
    pub chunk_count: usize,
}

pub struct VectorStore {
    pool: PgPool,
    embedder: EmbeddingClient,
}

impl VectorStore {
    pub fn new(pool: PgPool, embedder: EmbeddingClient) -> Self {
        Self { pool, embedder }
    }

    // ── Resumes ─────────────────────────────────────────────────────────

    /// Chunks, embeds, and stores one resume under a fresh identifier.
    /// All chunk rows land in a single transaction — a failed embedding or
    /// insert leaves no partial document behind.
    pub async fn store_resume(
        &self,
        owner_id: &str,
        filename: &str,
        text: &str,
        api_key: Option<&str>,
    ) -> Result<StoredResume, RetrievalError> {
        let resume_id = Uuid::new_v4();
        let chunks = chunk::chunk_text(text);
        if chunks.is_empty() {
            warn!("store_resume: empty document {filename} for {owner_id}, nothing stored");
            return Ok(StoredResume {
                resume_id,
                chunk_count: 0,
            });
        }

        debug!(
            "store_resume: {} chunks for {filename} (owner {owner_id})",
            chunks.len()
        );
        let vectors = self.embedder.embed(&chunks, api_key).await?;

        let mut tx = self.pool.begin().await?;
        for (index, (chunk, vector)) in chunks.iter().zip(&vectors).enumerate() {
            sqlx::query(
                r#"
                INSERT INTO resume_chunks
                    (id, resume_id, owner_id, filename, chunk_index, content, embedding)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(resume_id)
            .bind(owner_id)
            .bind(filename)
            .bind(index as i32)
            .bind(chunk)
            .bind(vector.as_slice())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(
            "stored resume {filename} as {resume_id} ({} chunks) for {owner_id}",
            chunks.len()
        );
        Ok(StoredResume {
            resume_id,
            chunk_count: chunks.len(),
        })
    }

    /// Semantic search over the tenant's resumes. An empty result list is a
    /// valid outcome; only backend failures are errors.
    pub async fn search_resumes(
        &self,
        owner_id: &str,
        query_text: &str,
        k: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<ResumeMatch>, RetrievalError> {
        let query_vector = self.embedder.embed_one(query_text, api_key).await?;

        let rows = sqlx::query(
            r#"
            SELECT resume_id, filename, content, embedding, created_at
            FROM resume_chunks
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut hits = Vec::with_capacity(rows.len());
        for row in rows {
            let embedding: Vec<f32> = row.try_get("embedding")?;
            hits.push(ChunkHit {
                document_id: row.try_get("resume_id")?,
                filename: row.try_get("filename")?,
                text: row.try_get("content")?,
                score: cosine_similarity(&query_vector, &embedding),
                created_at: row.try_get("created_at")?,
            });
        }

        let ranked = rank_documents(hits, k);
        debug!(
            "search_resumes: {} documents ranked for owner {owner_id}",
            ranked.len()
        );
        Ok(ranked
            .into_iter()
            .map(|d| ResumeMatch {
                resume_id: d.document_id,
                filename: d.filename,
                score: d.score,
                excerpt: d.best_chunk,
            })
            .collect())
    }

    /// Lists the tenant's stored documents, newest first.
    pub async fn list_resumes(&self, owner_id: &str) -> Result<Vec<ResumeDocument>, RetrievalError> {
        let rows = sqlx::query(
            r#"
            SELECT resume_id, filename, COUNT(*) AS chunk_count, MIN(created_at) AS created_at
            FROM resume_chunks
            WHERE owner_id = $1
            GROUP BY resume_id, filename
            ORDER BY MIN(created_at) DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ResumeDocument {
                    id: row.try_get("resume_id")?,
                    owner_id: owner_id.to_string(),
                    filename: row.try_get("filename")?,
                    chunk_count: row.try_get("chunk_count")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    /// Deletes one document and all of its chunks. Returns the number of
    /// chunk rows removed (0 when the document does not exist for this
    /// tenant — deleting someone else's document is indistinguishable from
    /// deleting nothing).
    pub async fn delete_resume(
        &self,
        owner_id: &str,
        resume_id: Uuid,
    ) -> Result<u64, RetrievalError> {
        let result = sqlx::query(
            "DELETE FROM resume_chunks WHERE owner_id = $1 AND resume_id = $2",
        )
        .bind(owner_id)
        .bind(resume_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ── Jobs ────────────────────────────────────────────────────────────

    /// Stores a job posting, embedding its title and description together.
    pub async fn store_job(
        &self,
        owner_id: &str,
        job: NewJob,
        api_key: Option<&str>,
    ) -> Result<JobDefinition, RetrievalError> {
        let embedding_input = format!("{}\n\n{}", job.title, job.description);
        let vector = self.embedder.embed_one(&embedding_input, api_key).await?;

        let id = Uuid::new_v4();
        let posted_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO jobs
                (id, owner_id, title, description, employment_type, job_category,
                 job_level, skills_required, salary_min, salary_max,
                 application_url, embedding)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING posted_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.employment_type)
        .bind(&job.job_category)
        .bind(&job.job_level)
        .bind(&job.skills_required)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.application_url)
        .bind(vector.as_slice())
        .fetch_one(&self.pool)
        .await?;

        info!("stored job {id} ({}) for {owner_id}", job.title);
        Ok(JobDefinition {
            id,
            owner_id: owner_id.to_string(),
            title: job.title,
            description: job.description,
            employment_type: job.employment_type,
            job_category: job.job_category,
            job_level: job.job_level,
            skills_required: job.skills_required,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            application_url: job.application_url,
            posted_at,
        })
    }

    /// Natural-language job search within the tenant's postings, with
    /// optional level/category filters applied in the query itself.
    pub async fn search_jobs(
        &self,
        owner_id: &str,
        query_text: &str,
        limit: usize,
        filters: &JobFilters,
        api_key: Option<&str>,
    ) -> Result<Vec<JobMatch>, RetrievalError> {
        let query_vector = self.embedder.embed_one(query_text, api_key).await?;
        let jobs = self.fetch_jobs(owner_id, filters).await?;

        let mut matches: Vec<JobMatch> = jobs
            .into_iter()
            .map(|(job, embedding)| JobMatch {
                score: cosine_similarity(&query_vector, &embedding),
                job,
            })
            .collect();
        sort_job_matches(&mut matches);
        matches.truncate(limit);
        Ok(matches)
    }

    /// Ranks the tenant's jobs against one stored resume. Each job scores by
    /// its best cosine against any of the resume's chunk vectors — the same
    /// max aggregation used for document search.
    pub async fn match_resume_to_jobs(
        &self,
        owner_id: &str,
        resume_id: Uuid,
        limit: usize,
    ) -> Result<Vec<JobMatch>, RetrievalError> {
        let rows = sqlx::query(
            "SELECT embedding FROM resume_chunks WHERE owner_id = $1 AND resume_id = $2",
        )
        .bind(owner_id)
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(RetrievalError::NotFound(format!(
                "resume {resume_id} has no stored chunks"
            )));
        }

        let resume_vectors: Vec<Vec<f32>> = rows
            .into_iter()
            .map(|row| row.try_get("embedding"))
            .collect::<Result<_, _>>()?;

        let jobs = self.fetch_jobs(owner_id, &JobFilters::default()).await?;
        let mut matches: Vec<JobMatch> = jobs
            .into_iter()
            .map(|(job, embedding)| {
                let score = resume_vectors
                    .iter()
                    .map(|v| cosine_similarity(v, &embedding))
                    .fold(f32::MIN, f32::max);
                JobMatch { score, job }
            })
            .collect();
        sort_job_matches(&mut matches);
        matches.truncate(limit);
        Ok(matches)
    }

    /// Lists the tenant's job postings, newest first.
    pub async fn list_jobs(&self, owner_id: &str) -> Result<Vec<JobDefinition>, RetrievalError> {
        let mut jobs: Vec<JobDefinition> = self
            .fetch_jobs(owner_id, &JobFilters::default())
            .await?
            .into_iter()
            .map(|(job, _)| job)
            .collect();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(jobs)
    }

    async fn fetch_jobs(
        &self,
        owner_id: &str,
        filters: &JobFilters,
    ) -> Result<Vec<(JobDefinition, Vec<f32>)>, RetrievalError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, employment_type, job_category, job_level,
                   skills_required, salary_min, salary_max, application_url,
                   embedding, posted_at
            FROM jobs
            WHERE owner_id = $1
              AND ($2::text IS NULL OR job_level = $2)
              AND ($3::text IS NULL OR job_category = $3)
            "#,
        )
        .bind(owner_id)
        .bind(&filters.job_level)
        .bind(&filters.job_category)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let embedding: Vec<f32> = row.try_get("embedding")?;
                let job = JobDefinition {
                    id: row.try_get("id")?,
                    owner_id: owner_id.to_string(),
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    employment_type: row.try_get("employment_type")?,
                    job_category: row.try_get("job_category")?,
                    job_level: row.try_get("job_level")?,
                    skills_required: row.try_get("skills_required")?,
                    salary_min: row.try_get("salary_min")?,
                    salary_max: row.try_get("salary_max")?,
                    application_url: row.try_get("application_url")?,
                    posted_at: row.try_get("posted_at")?,
                };
                Ok((job, embedding))
            })
            .collect()
    }

    // ── Activity log ────────────────────────────────────────────────────

    /// Appends one audit row. Never updates or deletes existing rows.
    pub async fn log_activity(
        &self,
        owner_id: &str,
        kind: ActivityKind,
        filename: &str,
        score: i32,
        decision: Option<&str>,
    ) -> Result<(), RetrievalError> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (id, owner_id, activity_type, filename, score, decision)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(kind.as_str())
        .bind(filename)
        .bind(score)
        .bind(decision)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Per-tenant dashboard aggregates plus the 5 most recent activities.
    pub async fn dashboard_stats(&self, owner_id: &str) -> Result<DashboardStats, RetrievalError> {
        let total_resumes: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT resume_id) FROM resume_chunks WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE activity_type = 'screen')    AS auto_screened,
                COUNT(*) FILTER (WHERE score >= $2)                 AS high_matches,
                COUNT(*) FILTER (WHERE activity_type = 'skill_gap') AS skill_gaps,
                COUNT(*) FILTER (WHERE activity_type = 'quality')   AS quality_scored
            FROM activity_log
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .bind(HIGH_MATCH_SCORE)
        .fetch_one(&self.pool)
        .await?;

        let recent_rows = sqlx::query(
            r#"
            SELECT id, activity_type, filename, score, decision, created_at
            FROM activity_log
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT 5
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let recent_activity = recent_rows
            .into_iter()
            .map(|r| {
                Ok(ActivityRecord {
                    id: r.try_get("id")?,
                    owner_id: owner_id.to_string(),
                    activity_type: r.try_get("activity_type")?,
                    filename: r.try_get("filename")?,
                    score: r.try_get("score")?,
                    decision: r.try_get("decision")?,
                    created_at: r.try_get("created_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(DashboardStats {
            total_resumes,
            auto_screened: row.try_get("auto_screened")?,
            high_matches: row.try_get("high_matches")?,
            skill_gaps: row.try_get("skill_gaps")?,
            quality_scored: row.try_get("quality_scored")?,
            recent_activity,
        })
    }
}

fn sort_job_matches(matches: &mut [JobMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.job.posted_at.cmp(&a.job.posted_at))
    });
}
