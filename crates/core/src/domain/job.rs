// Job Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Job ID (UUID v4)
pub type JobId = String;

/// Company identifier
pub type CompanyId = String;

/// User identifier (issued by the auth provider)
pub type UserId = String;

/// Job status
///
/// `OnHold` exists in stored data but nothing transitions into or out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Closed,
    OnHold,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Open => write!(f, "OPEN"),
            JobStatus::Closed => write!(f, "CLOSED"),
            JobStatus::OnHold => write!(f, "ON_HOLD"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "OPEN" => Ok(JobStatus::Open),
            "CLOSED" => Ok(JobStatus::Closed),
            "ON_HOLD" => Ok(JobStatus::OnHold),
            _ => Err(DomainError::UnknownVariant {
                kind: "job status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmploymentType::FullTime => write!(f, "FULL_TIME"),
            EmploymentType::PartTime => write!(f, "PART_TIME"),
            EmploymentType::Contract => write!(f, "CONTRACT"),
            EmploymentType::Internship => write!(f, "INTERNSHIP"),
            EmploymentType::Freelance => write!(f, "FREELANCE"),
        }
    }
}

impl FromStr for EmploymentType {
    type Err = DomainError;

    /// Accepts `FULL_TIME`, `full-time`, `Full Time`, ...
    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "FULL_TIME" => Ok(EmploymentType::FullTime),
            "PART_TIME" => Ok(EmploymentType::PartTime),
            "CONTRACT" => Ok(EmploymentType::Contract),
            "INTERNSHIP" => Ok(EmploymentType::Internship),
            "FREELANCE" => Ok(EmploymentType::Freelance),
            _ => Err(DomainError::UnknownVariant {
                kind: "employment type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkMode {
    OnSite,
    Remote,
    Hybrid,
}

impl std::fmt::Display for WorkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkMode::OnSite => write!(f, "ON_SITE"),
            WorkMode::Remote => write!(f, "REMOTE"),
            WorkMode::Hybrid => write!(f, "HYBRID"),
        }
    }
}

impl FromStr for WorkMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "ON_SITE" | "ONSITE" => Ok(WorkMode::OnSite),
            "REMOTE" => Ok(WorkMode::Remote),
            "HYBRID" => Ok(WorkMode::Hybrid),
            _ => Err(DomainError::UnknownVariant {
                kind: "work mode",
                value: s.to_string(),
            }),
        }
    }
}

fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

/// Years of experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRange {
    pub min: f64,
    pub max: f64,
}

/// Validated job content, produced by the create/update validators
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub company_id: CompanyId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub employment_type: EmploymentType,
    pub work_mode: WorkMode,
    pub location: Location,
    pub salary: SalaryRange,
    pub experience: ExperienceRange,
    pub skills: Vec<String>,
    pub application_deadline: Option<i64>,
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    // Identity & ownership
    pub id: JobId,
    pub company_id: CompanyId,
    pub posted_by: UserId,

    // Posting content
    pub title: String,
    pub description: String,
    pub category: String,
    pub employment_type: EmploymentType,
    pub work_mode: WorkMode,
    pub location: Location,
    pub salary: SalaryRange,
    pub experience: ExperienceRange,
    pub skills: Vec<String>,

    // Lifecycle
    pub status: JobStatus,
    pub application_deadline: Option<i64>, // epoch ms
    pub featured: bool,

    // Monotonic counters
    pub views: i64,
    pub applications_count: i64,

    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl Job {
    /// Create a new open, non-featured job
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `posted_by` - Creating user
    /// * `draft` - Validated content
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        posted_by: impl Into<String>,
        draft: JobDraft,
    ) -> Self {
        Self {
            id: id.into(),
            company_id: draft.company_id,
            posted_by: posted_by.into(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            employment_type: draft.employment_type,
            work_mode: draft.work_mode,
            location: draft.location,
            salary: draft.salary,
            experience: draft.experience,
            skills: draft.skills,
            status: JobStatus::Open,
            application_deadline: draft.application_deadline,
            featured: false,
            views: 0,
            applications_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// See [`is_visible`]
    pub fn is_visible(&self, now_millis: i64) -> bool {
        is_visible(self, now_millis)
    }

    /// Open with a deadline strictly before `now_millis` (what the expiry sweep closes)
    pub fn is_overdue(&self, now_millis: i64) -> bool {
        self.status == JobStatus::Open
            && self
                .application_deadline
                .is_some_and(|deadline| deadline < now_millis)
    }

    /// Whether the public may see this job as featured
    pub fn is_publicly_featured(&self, now_millis: i64) -> bool {
        self.featured && self.is_visible(now_millis)
    }

    /// Lowercased title, description and skills, one per line
    ///
    /// Keyword search is a substring test against this text. Stores persist
    /// it next to the row so they never fold case themselves.
    pub fn search_text(&self) -> String {
        let mut text = self.title.to_lowercase();
        text.push('\n');
        text.push_str(&self.description.to_lowercase());
        for skill in &self.skills {
            text.push('\n');
            text.push_str(&skill.to_lowercase());
        }
        text
    }

    /// Transition Open -> Closed with explicit timestamp
    pub fn close(&mut self, now_millis: i64) -> Result<()> {
        if self.status != JobStatus::Open {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: JobStatus::Closed.to_string(),
            });
        }
        self.status = JobStatus::Closed;
        self.updated_at = now_millis;
        Ok(())
    }

    /// Flip the featured flag regardless of status, returning the new value
    pub fn toggle_featured(&mut self, now_millis: i64) -> bool {
        self.featured = !self.featured;
        self.updated_at = now_millis;
        self.featured
    }

    /// Replace the posting content, keeping identity, lifecycle and counters
    pub fn apply_draft(&mut self, draft: JobDraft, now_millis: i64) {
        self.company_id = draft.company_id;
        self.title = draft.title;
        self.description = draft.description;
        self.category = draft.category;
        self.employment_type = draft.employment_type;
        self.work_mode = draft.work_mode;
        self.location = draft.location;
        self.salary = draft.salary;
        self.experience = draft.experience;
        self.skills = draft.skills;
        self.application_deadline = draft.application_deadline;
        self.updated_at = now_millis;
    }

    /// Current content as a draft (base for partial updates)
    pub fn to_draft(&self) -> JobDraft {
        JobDraft {
            company_id: self.company_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            employment_type: self.employment_type,
            work_mode: self.work_mode,
            location: self.location.clone(),
            salary: self.salary.clone(),
            experience: self.experience.clone(),
            skills: self.skills.clone(),
            application_deadline: self.application_deadline,
        }
    }
}

/// Is the job live for public and job-seeker callers at `now_millis`?
///
/// True iff the stored status is Open and the deadline is absent or not yet
/// passed. Every public read path goes through this predicate (or the store
/// encoding of `Visibility::PublicAt`, which must agree with it).
pub fn is_visible(job: &Job, now_millis: i64) -> bool {
    job.status == JobStatus::Open
        && job
            .application_deadline
            .map_or(true, |deadline| deadline >= now_millis)
}
