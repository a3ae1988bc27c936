// SQLite JobRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobboard_core::domain::{
    EmploymentType, ExperienceRange, Job, JobFilter, JobId, JobQuery, JobSort, JobStatus,
    Location, SalaryRange, Visibility, WorkMode,
};
use jobboard_core::error::{AppError, Result};
use jobboard_core::port::JobRepository;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const JOB_COLUMNS: &str = "id, company_id, posted_by, title, description, category, \
    employment_type, work_mode, city, state, country, salary_min, salary_max, salary_currency, \
    experience_min, experience_max, skills, status, application_deadline, featured, views, \
    applications_count, created_at, updated_at";

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause for `filter`
///
/// `Visibility::PublicAt` is the SQL form of `jobboard_core::domain::is_visible`
/// and must stay in step with it.
fn push_filter<'args>(qb: &mut QueryBuilder<'args, Sqlite>, filter: &JobFilter) {
    qb.push(" WHERE 1 = 1");

    if let Visibility::PublicAt(now) = filter.visibility {
        qb.push(" AND status = ")
            .push_bind(JobStatus::Open.to_string())
            .push(" AND (application_deadline IS NULL OR application_deadline >= ")
            .push_bind(now)
            .push(")");
    }

    if let Some(keyword) = &filter.keyword {
        // search_text is already lowercased by Job::search_text
        let pattern = format!("%{}%", escape_like(&keyword.to_lowercase()));
        qb.push(" AND search_text LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'");
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ")
            .push_bind(category.clone())
            .push(" COLLATE NOCASE");
    }
    if let Some(city) = &filter.city {
        qb.push(" AND city = ")
            .push_bind(city.clone())
            .push(" COLLATE NOCASE");
    }
    if let Some(employment_type) = filter.employment_type {
        qb.push(" AND employment_type = ")
            .push_bind(employment_type.to_string());
    }
    if let Some(work_mode) = filter.work_mode {
        qb.push(" AND work_mode = ").push_bind(work_mode.to_string());
    }
    if let Some(company_id) = &filter.company_id {
        qb.push(" AND company_id = ").push_bind(company_id.clone());
    }
    if let Some(min_salary) = filter.min_salary {
        qb.push(" AND salary_max >= ").push_bind(min_salary);
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn order_by(sort: JobSort) -> &'static str {
    match sort {
        JobSort::Newest => " ORDER BY created_at DESC, id DESC",
        JobSort::Oldest => " ORDER BY created_at ASC, id ASC",
        JobSort::SalaryDesc => " ORDER BY salary_max DESC, created_at DESC, id DESC",
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn insert(&self, job: &Job) -> Result<()> {
        let skills = serde_json::to_string(&job.skills)?;

        sqlx::query(&format!(
            "INSERT INTO jobs ({}, search_text) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            JOB_COLUMNS
        ))
        .bind(&job.id)
        .bind(&job.company_id)
        .bind(&job.posted_by)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category)
        .bind(job.employment_type.to_string())
        .bind(job.work_mode.to_string())
        .bind(&job.location.city)
        .bind(&job.location.state)
        .bind(&job.location.country)
        .bind(job.salary.min)
        .bind(job.salary.max)
        .bind(&job.salary.currency)
        .bind(job.experience.min)
        .bind(job.experience.max)
        .bind(&skills)
        .bind(job.status.to_string())
        .bind(job.application_deadline)
        .bind(job.featured)
        .bind(job.views)
        .bind(job.applications_count)
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(job.search_text())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn update(&self, job: &Job) -> Result<()> {
        let skills = serde_json::to_string(&job.skills)?;

        sqlx::query(
            r#"
            UPDATE jobs
            SET company_id = ?, title = ?, description = ?, category = ?,
                employment_type = ?, work_mode = ?, city = ?, state = ?, country = ?,
                salary_min = ?, salary_max = ?, salary_currency = ?,
                experience_min = ?, experience_max = ?, skills = ?, search_text = ?,
                status = ?, application_deadline = ?, featured = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category)
        .bind(job.employment_type.to_string())
        .bind(job.work_mode.to_string())
        .bind(&job.location.city)
        .bind(&job.location.state)
        .bind(&job.location.country)
        .bind(job.salary.min)
        .bind(job.salary.max)
        .bind(&job.salary.currency)
        .bind(job.experience.min)
        .bind(job.experience.max)
        .bind(&skills)
        .bind(job.search_text())
        .bind(job.status.to_string())
        .bind(job.application_deadline)
        .bind(job.featured)
        .bind(job.updated_at)
        .bind(&job.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &JobId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, query: &JobQuery) -> Result<Vec<Job>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_filter(&mut qb, &query.filter);
        qb.push(order_by(query.sort))
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let rows = qb
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_job).collect()
    }

    async fn count(&self, filter: &JobFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut qb, filter);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn toggle_featured(&self, id: &JobId, now_millis: i64) -> Result<Option<bool>> {
        // Single statement: concurrent toggles serialize in the store
        sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE jobs
            SET featured = NOT featured, updated_at = ?
            WHERE id = ?
            RETURNING featured
            "#,
        )
        .bind(now_millis)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn close_overdue(&self, now_millis: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = ?, updated_at = ?
            WHERE status = ?
              AND application_deadline IS NOT NULL
              AND application_deadline < ?
            "#,
        )
        .bind(JobStatus::Closed.to_string())
        .bind(now_millis)
        .bind(JobStatus::Open.to_string())
        .bind(now_millis)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn increment_views(&self, id: &JobId) -> Result<()> {
        sqlx::query("UPDATE jobs SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    company_id: String,
    posted_by: String,
    title: String,
    description: String,
    category: String,
    employment_type: String,
    work_mode: String,
    city: String,
    state: Option<String>,
    country: Option<String>,
    salary_min: f64,
    salary_max: f64,
    salary_currency: String,
    experience_min: f64,
    experience_max: f64,
    skills: String, // JSON array
    status: String,
    application_deadline: Option<i64>,
    featured: bool,
    views: i64,
    applications_count: i64,
    created_at: i64,
    updated_at: i64,
}

impl JobRow {
    fn into_job(self) -> Result<Job> {
        let status = self
            .status
            .parse::<JobStatus>()
            .map_err(|e| corrupt(&self.id, "status", e))?;
        let employment_type = self
            .employment_type
            .parse::<EmploymentType>()
            .map_err(|e| corrupt(&self.id, "employment_type", e))?;
        let work_mode = self
            .work_mode
            .parse::<WorkMode>()
            .map_err(|e| corrupt(&self.id, "work_mode", e))?;
        let skills: Vec<String> =
            serde_json::from_str(&self.skills).map_err(|e| corrupt(&self.id, "skills", e))?;

        Ok(Job {
            id: self.id,
            company_id: self.company_id,
            posted_by: self.posted_by,
            title: self.title,
            description: self.description,
            category: self.category,
            employment_type,
            work_mode,
            location: Location {
                city: self.city,
                state: self.state,
                country: self.country,
            },
            salary: SalaryRange {
                min: self.salary_min,
                max: self.salary_max,
                currency: self.salary_currency,
            },
            experience: ExperienceRange {
                min: self.experience_min,
                max: self.experience_max,
            },
            skills,
            status,
            application_deadline: self.application_deadline,
            featured: self.featured,
            views: self.views,
            applications_count: self.applications_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn corrupt(id: &str, field: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Database(format!("job {} has invalid {}: {}", id, field, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{job, setup_test_db};
    use jobboard_core::domain::{is_visible, PageRequest};

    const NOW: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let mut original = job("job-1", NOW);
        original.application_deadline = Some(NOW + 1);
        original.location.state = Some("BE".to_string());
        repo.insert(&original).await.unwrap();

        let found = repo.find_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(found, original);
        assert!(repo.find_by_id(&"nope".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_for_unknown_company_fails() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let mut orphan = job("job-1", NOW);
        orphan.company_id = "ghost".to_string();
        assert!(matches!(
            repo.insert(&orphan).await.unwrap_err(),
            AppError::Database(_)
        ));
    }

    #[tokio::test]
    async fn test_update_leaves_counters() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let mut stored = job("job-1", NOW);
        repo.insert(&stored).await.unwrap();
        repo.increment_views(&stored.id).await.unwrap();
        sqlx::query("UPDATE jobs SET applications_count = 1 WHERE id = ?")
            .bind(&stored.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        stored.title = "Platform Engineer".to_string();
        stored.status = JobStatus::Closed;
        stored.updated_at = NOW + 5;
        repo.update(&stored).await.unwrap();

        let found = repo.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Platform Engineer");
        assert_eq!(found.status, JobStatus::Closed);
        assert_eq!(found.views, 1);
        assert_eq!(found.applications_count, 1);
    }

    #[tokio::test]
    async fn test_toggle_featured_flips_and_reports_missing() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);
        repo.insert(&job("job-1", NOW)).await.unwrap();

        let id = "job-1".to_string();
        assert_eq!(repo.toggle_featured(&id, NOW).await.unwrap(), Some(true));
        assert_eq!(repo.toggle_featured(&id, NOW).await.unwrap(), Some(false));
        assert_eq!(
            repo.toggle_featured(&"missing".to_string(), NOW).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_close_overdue_is_idempotent() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let mut overdue = job("overdue", NOW);
        overdue.application_deadline = Some(NOW - 1);
        overdue.featured = true;
        let mut on_time = job("on-time", NOW);
        on_time.application_deadline = Some(NOW);
        let mut held = job("held", NOW);
        held.application_deadline = Some(NOW - 1);
        held.status = JobStatus::OnHold;
        for j in [&overdue, &on_time, &held, &job("open", NOW)] {
            repo.insert(j).await.unwrap();
        }

        assert_eq!(repo.close_overdue(NOW).await.unwrap(), 1);
        assert_eq!(repo.close_overdue(NOW).await.unwrap(), 0);

        let closed = repo.find_by_id(&overdue.id).await.unwrap().unwrap();
        assert_eq!(closed.status, JobStatus::Closed);
        assert!(closed.featured);
        assert_eq!(
            repo.find_by_id(&held.id).await.unwrap().unwrap().status,
            JobStatus::OnHold
        );
    }

    #[tokio::test]
    async fn test_public_filter_agrees_with_is_visible() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let statuses = [JobStatus::Open, JobStatus::Closed, JobStatus::OnHold];
        let deadlines = [None, Some(NOW - 1), Some(NOW), Some(NOW + 1)];
        let mut all = Vec::new();
        for (i, status) in statuses.iter().enumerate() {
            for (k, deadline) in deadlines.iter().enumerate() {
                for featured in [false, true] {
                    let mut j = job(&format!("job-{i}-{k}-{featured}"), NOW);
                    j.status = *status;
                    j.application_deadline = *deadline;
                    j.featured = featured;
                    repo.insert(&j).await.unwrap();
                    all.push(j);
                }
            }
        }

        for at in [NOW - 1, NOW, NOW + 1] {
            let mut query = JobQuery::new(JobFilter::public(at));
            query.page = PageRequest::new(Some(1), Some(100));
            let mut got: Vec<String> =
                repo.find(&query).await.unwrap().into_iter().map(|j| j.id).collect();
            got.sort();

            let mut expected: Vec<String> = all
                .iter()
                .filter(|j| is_visible(j, at))
                .map(|j| j.id.clone())
                .collect();
            expected.sort();

            assert_eq!(got, expected, "at {at}");
            assert_eq!(
                repo.count(&JobFilter::public(at)).await.unwrap(),
                expected.len() as i64
            );
        }
    }

    #[tokio::test]
    async fn test_search_filters_match_in_memory_rules() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let mut a = job("a", NOW);
        a.title = "Senior Rust Developer".to_string();
        a.skills = vec!["tokio".to_string()];
        let mut b = job("b", NOW + 1);
        b.title = "Designer".to_string();
        b.description = "Figma all day".to_string();
        b.skills = vec!["Rust_FFI".to_string()];
        b.category = "Design".to_string();
        b.work_mode = WorkMode::Remote;
        b.salary.max = 40_000.0;
        let mut c = job("c", NOW + 2);
        c.title = "Accountant".to_string();
        c.description = "Numbers".to_string();
        c.skills = vec!["excel".to_string()];
        c.employment_type = EmploymentType::PartTime;
        c.location.city = "Munich".to_string();
        let mut d = job("d", NOW + 3);
        d.title = "Übersetzer Senior".to_string();
        d.description = "Fachtexte für Straßenbau".to_string();
        d.skills = vec!["ÉTUDES".to_string()];
        let jobs = [a, b, c, d];
        for j in &jobs {
            repo.insert(j).await.unwrap();
        }

        let mut filters = Vec::new();
        let mut f = JobFilter::all();
        f.keyword = Some("RUST".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.keyword = Some("t_f".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.keyword = Some("übersetzer".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.keyword = Some("STRASSE".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.keyword = Some("études".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.category = Some("design".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.city = Some("MUNICH".to_string());
        filters.push(f);
        let mut f = JobFilter::all();
        f.work_mode = Some(WorkMode::Remote);
        filters.push(f);
        let mut f = JobFilter::all();
        f.employment_type = Some(EmploymentType::PartTime);
        filters.push(f);
        let mut f = JobFilter::all();
        f.min_salary = Some(50_000.0);
        filters.push(f);

        for filter in filters {
            let mut query = JobQuery::new(filter.clone());
            query.sort = JobSort::Oldest;
            let got: Vec<String> =
                repo.find(&query).await.unwrap().into_iter().map(|j| j.id).collect();
            let expected: Vec<String> = jobs
                .iter()
                .filter(|j| filter.matches(j))
                .map(|j| j.id.clone())
                .collect();
            assert_eq!(got, expected, "{filter:?}");
        }
    }

    #[tokio::test]
    async fn test_update_refreshes_keyword_text() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);

        let mut stored = job("job-1", NOW);
        repo.insert(&stored).await.unwrap();
        stored.title = "Ärztin im Praktikum".to_string();
        repo.update(&stored).await.unwrap();

        let mut filter = JobFilter::all();
        filter.keyword = Some("ÄRZTIN".to_string());
        assert_eq!(repo.count(&filter).await.unwrap(), 1);
        filter.keyword = Some("backend".to_string());
        assert_eq!(repo.count(&filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pagination_and_sort() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);
        for i in 0..12 {
            let mut j = job(&format!("job-{i:02}"), NOW + i);
            j.salary.max = 1_000.0 * (i as f64);
            repo.insert(&j).await.unwrap();
        }

        let mut query = JobQuery::new(JobFilter::all());
        query.page = PageRequest::new(Some(2), Some(5));
        let page: Vec<String> =
            repo.find(&query).await.unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(page, vec!["job-06", "job-05", "job-04", "job-03", "job-02"]);

        query.page = PageRequest::new(Some(3), Some(5));
        assert_eq!(repo.find(&query).await.unwrap().len(), 2);
        assert_eq!(repo.count(&JobFilter::all()).await.unwrap(), 12);

        query.sort = JobSort::SalaryDesc;
        query.page = PageRequest::new(Some(1), Some(1));
        assert_eq!(repo.find(&query).await.unwrap()[0].id, "job-11");
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool);
        repo.insert(&job("job-1", NOW)).await.unwrap();

        assert!(repo.delete(&"job-1".to_string()).await.unwrap());
        assert!(!repo.delete(&"job-1".to_string()).await.unwrap());
    }
}
