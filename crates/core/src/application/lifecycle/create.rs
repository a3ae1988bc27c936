// Job create/update requests and their all-at-once validation

use crate::application::constants::{DEFAULT_CURRENCY, MAX_TITLE_LEN};
use crate::domain::{
    EmploymentType, ExperienceRange, Job, JobDraft, Location, SalaryRange, ValidationErrors,
    WorkMode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationInput {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Salary bounds arrive as JSON numbers or numeric strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryInput {
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceInput {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

/// Create request: every field optional on the wire so that all missing
/// ones can be reported together
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateJobRequest {
    pub company_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub employment_type: Option<String>,
    pub work_mode: Option<String>,
    pub location: Option<LocationInput>,
    pub salary: Option<SalaryInput>,
    pub experience: Option<ExperienceInput>,
    pub skills: Option<Vec<String>>,
    pub application_deadline: Option<i64>,
}

/// Partial update: `Some` fields replace the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateJobRequest {
    pub company_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub employment_type: Option<String>,
    pub work_mode: Option<String>,
    pub location: Option<LocationInput>,
    pub salary: Option<SalaryInput>,
    pub experience: Option<ExperienceInput>,
    pub skills: Option<Vec<String>>,
    pub application_deadline: Option<i64>,
    pub clear_application_deadline: bool,
}

impl UpdateJobRequest {
    /// Overlay this patch on the job's current content, producing a full request
    /// that goes through the same validation as create
    pub fn merge_onto(self, job: &Job) -> CreateJobRequest {
        let current = CreateJobRequest::from(job);
        let application_deadline = if self.clear_application_deadline {
            None
        } else {
            self.application_deadline.or(current.application_deadline)
        };

        CreateJobRequest {
            company_id: self.company_id.or(current.company_id),
            title: self.title.or(current.title),
            description: self.description.or(current.description),
            category: self.category.or(current.category),
            employment_type: self.employment_type.or(current.employment_type),
            work_mode: self.work_mode.or(current.work_mode),
            location: self.location.or(current.location),
            salary: self.salary.or(current.salary),
            experience: self.experience.or(current.experience),
            skills: self.skills.or(current.skills),
            application_deadline,
        }
    }
}

impl From<&Job> for CreateJobRequest {
    fn from(job: &Job) -> Self {
        Self {
            company_id: Some(job.company_id.clone()),
            title: Some(job.title.clone()),
            description: Some(job.description.clone()),
            category: Some(job.category.clone()),
            employment_type: Some(job.employment_type.to_string()),
            work_mode: Some(job.work_mode.to_string()),
            location: Some(LocationInput {
                city: Some(job.location.city.clone()),
                state: job.location.state.clone(),
                country: job.location.country.clone(),
            }),
            salary: Some(SalaryInput {
                min: Some(Value::from(job.salary.min)),
                max: Some(Value::from(job.salary.max)),
                currency: Some(job.salary.currency.clone()),
            }),
            experience: Some(ExperienceInput {
                min: Some(Value::from(job.experience.min)),
                max: Some(Value::from(job.experience.max)),
            }),
            skills: Some(job.skills.clone()),
            application_deadline: job.application_deadline,
        }
    }
}

/// Validate a create request, reporting every failing field at once
pub fn validate_request(req: &CreateJobRequest) -> Result<JobDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let draft = collect_draft(req, &mut errors);
    match draft {
        Some(draft) if errors.is_empty() => Ok(draft),
        _ => Err(errors),
    }
}

/// Push every problem into `errors`; returns the draft only if all fields parsed
pub(crate) fn collect_draft(req: &CreateJobRequest, errors: &mut ValidationErrors) -> Option<JobDraft> {
    let company_id = required_text(errors, "company_id", req.company_id.as_deref());

    let title = required_text(errors, "title", req.title.as_deref());
    if let Some(title) = &title {
        if title.chars().count() > MAX_TITLE_LEN {
            errors.add(
                "title",
                format!("must be at most {} characters", MAX_TITLE_LEN),
            );
        }
    }

    let description = required_text(errors, "description", req.description.as_deref());
    let category = required_text(errors, "category", req.category.as_deref());

    let employment_type = required_text(errors, "employment_type", req.employment_type.as_deref())
        .and_then(|raw| match raw.parse::<EmploymentType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.add("employment_type", format!("unknown employment type '{}'", raw));
                None
            }
        });

    let work_mode = required_text(errors, "work_mode", req.work_mode.as_deref()).and_then(|raw| {
        match raw.parse::<WorkMode>() {
            Ok(m) => Some(m),
            Err(_) => {
                errors.add("work_mode", format!("unknown work mode '{}'", raw));
                None
            }
        }
    });

    let location_input = req.location.clone().unwrap_or_default();
    let city = required_text(errors, "location.city", location_input.city.as_deref());

    let salary_input = req.salary.clone().unwrap_or_default();
    let salary_min = required_number(errors, "salary.min", salary_input.min.as_ref());
    let salary_max = required_number(errors, "salary.max", salary_input.max.as_ref());
    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if min > max {
            errors.add("salary", "min must not exceed max");
        }
    }

    let experience_input = req.experience.clone().unwrap_or_default();
    let experience_min = required_number(errors, "experience.min", experience_input.min.as_ref());
    let experience_max = required_number(errors, "experience.max", experience_input.max.as_ref());
    if let (Some(min), Some(max)) = (experience_min, experience_max) {
        if min > max {
            errors.add("experience", "min must not exceed max");
        }
    }

    let skills: Vec<String> = req
        .skills
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .fold(Vec::new(), |mut acc, s| {
            if !acc.iter().any(|seen: &String| seen.eq_ignore_ascii_case(s)) {
                acc.push(s.to_string());
            }
            acc
        });
    if skills.is_empty() {
        errors.add("skills", "must list at least one skill");
    }

    Some(JobDraft {
        company_id: company_id?,
        title: title?,
        description: description?,
        category: category?,
        employment_type: employment_type?,
        work_mode: work_mode?,
        location: Location {
            city: city?,
            state: optional_text(location_input.state.as_deref()),
            country: optional_text(location_input.country.as_deref()),
        },
        salary: SalaryRange {
            min: salary_min?,
            max: salary_max?,
            currency: optional_text(salary_input.currency.as_deref())
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        },
        experience: ExperienceRange {
            min: experience_min?,
            max: experience_max?,
        },
        skills,
        application_deadline: req.application_deadline,
    })
}

/// Trimmed, non-blank text or a "is required" error
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    match optional_text(value) {
        Some(text) => Some(text),
        None => {
            errors.add(field, "is required");
            None
        }
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required_number(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<f64> {
    let number = optional_number(errors, field, value);
    if number.is_none() && !errors.contains(field) {
        errors.add(field, "is required");
    }
    number
}

/// Non-negative finite number (JSON number or numeric string)
///
/// Absent, null and blank are `None` without an error.
pub(super) fn optional_number(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<f64> {
    let value = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) if s.trim().is_empty() => return None,
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite());

    match parsed {
        Some(n) if n >= 0.0 => Some(n),
        Some(_) => {
            errors.add(field, "must not be negative");
            None
        }
        None => {
            errors.add(field, "must be a number");
            None
        }
    }
}
