// Search criteria -> store query

use crate::domain::{
    EmploymentType, JobFilter, JobQuery, JobSort, JobStatus, PageRequest, ValidationErrors,
    WorkMode,
};
use super::create::optional_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Listing criteria as sent by callers (all optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub employment_type: Option<String>,
    pub work_mode: Option<String>,
    pub city: Option<String>,
    pub company_id: Option<String>,
    /// JSON number or numeric string
    pub min_salary: Option<Value>,
    pub featured: Option<bool>,
    /// Stored status; only meaningful for admin listings
    pub status: Option<String>,
    pub sort: Option<JobSort>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchCriteria {
    /// Narrow `base` (which fixes the visibility) with these criteria
    pub fn into_query(self, base: JobFilter) -> Result<JobQuery, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut filter = base;

        filter.keyword = non_blank(self.keyword);
        filter.category = non_blank(self.category);
        filter.city = non_blank(self.city);
        // Constraints fixed by the base filter win over caller criteria
        filter.company_id = filter.company_id.or(non_blank(self.company_id));
        filter.featured = filter.featured.or(self.featured);

        if let Some(raw) = non_blank(self.employment_type) {
            match raw.parse::<EmploymentType>() {
                Ok(t) => filter.employment_type = Some(t),
                Err(e) => errors.add("employment_type", e.to_string()),
            }
        }
        if let Some(raw) = non_blank(self.work_mode) {
            match raw.parse::<WorkMode>() {
                Ok(m) => filter.work_mode = Some(m),
                Err(e) => errors.add("work_mode", e.to_string()),
            }
        }
        if let Some(raw) = non_blank(self.status) {
            match raw.parse::<JobStatus>() {
                Ok(s) => filter.status = Some(s),
                Err(e) => errors.add("status", e.to_string()),
            }
        }
        filter.min_salary = optional_number(&mut errors, "min_salary", self.min_salary.as_ref());

        errors.into_result()?;

        Ok(JobQuery {
            filter,
            sort: self.sort.unwrap_or_default(),
            page: PageRequest::new(self.page, self.limit),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
