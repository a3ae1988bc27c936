// Job Application Domain Model

use crate::domain::job::{JobId, UserId};
use serde::{Deserialize, Serialize};

/// Application ID (UUID v4)
pub type ApplicationId = String;

/// Canonical directory for stored resumes
pub const RESUME_DIR: &str = "uploads/resumes";

/// A job seeker's application to a job
///
/// `job_id` may dangle after the job is deleted; orphans are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: UserId,
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
    pub created_at: i64, // epoch ms
}

impl Application {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        job_id: impl Into<String>,
        applicant_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            applicant_id: applicant_id.into(),
            cover_letter: None,
            resume_path: None,
            created_at,
        }
    }
}

/// Canonicalize a stored resume location to `uploads/resumes/<file>`.
///
/// Historical records mix Windows separators, absolute server paths, full
/// URLs and repeated `uploads/` prefixes. Returns `None` for blank input or
/// paths containing `..`.
pub fn normalize_resume_path(raw: &str) -> Option<String> {
    let mut path = raw.trim().replace('\\', "/");
    if path.is_empty() {
        return None;
    }

    for scheme in ["http://", "https://"] {
        if let Some(rest) = path.strip_prefix(scheme) {
            path = rest
                .split_once('/')
                .map(|(_, p)| p.to_string())
                .unwrap_or_default();
            break;
        }
    }

    if let Some(end) = path.find(['?', '#']) {
        path.truncate(end);
    }

    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.contains(&"..") {
        return None;
    }

    let start = segments
        .iter()
        .rposition(|s| *s == "uploads")
        .map_or(0, |i| i + 1);
    let mut rest = &segments[start..];
    while rest.first() == Some(&"resumes") {
        rest = &rest[1..];
    }
    if rest.is_empty() {
        return None;
    }

    Some(format!("{}/{}", RESUME_DIR, rest.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_name() {
        assert_eq!(
            normalize_resume_path("cv.pdf").as_deref(),
            Some("uploads/resumes/cv.pdf")
        );
    }

    #[test]
    fn test_already_canonical() {
        assert_eq!(
            normalize_resume_path("uploads/resumes/cv.pdf").as_deref(),
            Some("uploads/resumes/cv.pdf")
        );
        assert_eq!(
            normalize_resume_path("/uploads/resumes/cv.pdf").as_deref(),
            Some("uploads/resumes/cv.pdf")
        );
    }

    #[test]
    fn test_windows_absolute_path() {
        assert_eq!(
            normalize_resume_path(r"C:\srv\app\uploads\resumes\cv.pdf").as_deref(),
            Some("uploads/resumes/cv.pdf")
        );
    }

    #[test]
    fn test_duplicated_prefix() {
        assert_eq!(
            normalize_resume_path("uploads/uploads/resumes/resumes/cv.pdf").as_deref(),
            Some("uploads/resumes/cv.pdf")
        );
    }

    #[test]
    fn test_full_url_with_query() {
        assert_eq!(
            normalize_resume_path("https://cdn.example.com/uploads/resumes/cv.pdf?v=2").as_deref(),
            Some("uploads/resumes/cv.pdf")
        );
    }

    #[test]
    fn test_rejects_blank_and_traversal() {
        assert_eq!(normalize_resume_path("   "), None);
        assert_eq!(normalize_resume_path("uploads/resumes/"), None);
        assert_eq!(normalize_resume_path("../../etc/passwd"), None);
    }
}
