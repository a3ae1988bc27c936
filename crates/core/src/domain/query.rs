// Job listing query contract (filters, visibility, pagination)

use crate::domain::job::{is_visible, CompanyId, EmploymentType, Job, JobStatus, WorkMode};
use serde::{Deserialize, Serialize};

/// Page size when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Which jobs a listing may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only jobs for which `is_visible(job, now)` holds
    PublicAt(i64),
    /// Every stored job (admin views)
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    Newest,
    Oldest,
    SalaryDesc,
}

/// Listing filter; every `Some` field narrows the result
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    pub visibility: Visibility,
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub work_mode: Option<WorkMode>,
    pub city: Option<String>,
    pub company_id: Option<CompanyId>,
    pub min_salary: Option<f64>,
    pub featured: Option<bool>,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    fn with_visibility(visibility: Visibility) -> Self {
        Self {
            visibility,
            keyword: None,
            category: None,
            employment_type: None,
            work_mode: None,
            city: None,
            company_id: None,
            min_salary: None,
            featured: None,
            status: None,
        }
    }

    /// Public listing: visible jobs only
    pub fn public(now_millis: i64) -> Self {
        Self::with_visibility(Visibility::PublicAt(now_millis))
    }

    /// Admin listing: all jobs regardless of visibility
    pub fn all() -> Self {
        Self::with_visibility(Visibility::All)
    }

    /// In-memory evaluation of the filter
    ///
    /// Store adapters translate the same rules into their query language;
    /// this is the reference they are tested against.
    pub fn matches(&self, job: &Job) -> bool {
        if let Visibility::PublicAt(now) = self.visibility {
            if !is_visible(job, now) {
                return false;
            }
        }
        if let Some(keyword) = &self.keyword {
            if !job.search_text().contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !job.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !job.location.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if self.employment_type.is_some_and(|t| t != job.employment_type) {
            return false;
        }
        if self.work_mode.is_some_and(|m| m != job.work_mode) {
            return false;
        }
        if self
            .company_id
            .as_ref()
            .is_some_and(|c| *c != job.company_id)
        {
            return false;
        }
        if self.min_salary.is_some_and(|min| job.salary.max < min) {
            return false;
        }
        if self.featured.is_some_and(|f| f != job.featured) {
            return false;
        }
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        true
    }
}

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Page defaults to 1, limit to `DEFAULT_PAGE_SIZE`, clamped to `1..=MAX_PAGE_SIZE`
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub filter: JobFilter,
    pub sort: JobSort,
    pub page: PageRequest,
}

impl JobQuery {
    pub fn new(filter: JobFilter) -> Self {
        Self {
            filter,
            sort: JobSort::default(),
            page: PageRequest::default(),
        }
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let limit = i64::from(request.limit);
        let total_pages = ((total.max(0) + limit - 1) / limit) as u32;
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
