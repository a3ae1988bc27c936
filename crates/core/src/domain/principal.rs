// Caller identity as classified by the auth gate

use crate::domain::job::{Job, UserId};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "job_seeker")]
    Jobseeker,
    Employer,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Jobseeker => write!(f, "jobseeker"),
            Role::Employer => write!(f, "employer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::domain::DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jobseeker" | "job_seeker" | "job-seeker" => Ok(Role::Jobseeker),
            "employer" => Ok(Role::Employer),
            "admin" => Ok(Role::Admin),
            _ => Err(crate::domain::DomainError::UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Poster of the job, or any admin
    pub fn can_manage(&self, job: &Job) -> bool {
        self.is_admin() || job.posted_by == self.id
    }
}

/// Who is calling: nobody in particular, or a known principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

impl Caller {
    /// Require a principal (`Unauthenticated` otherwise)
    pub fn principal(&self) -> Result<&Principal> {
        match self {
            Caller::Anonymous => Err(AppError::Unauthenticated),
            Caller::Authenticated(principal) => Ok(principal),
        }
    }

    /// Require a principal holding one of `roles` (`Forbidden` if authenticated with another role)
    pub fn require_role(&self, roles: &[Role], action: &str) -> Result<&Principal> {
        let principal = self.principal()?;
        if roles.contains(&principal.role) {
            Ok(principal)
        } else {
            Err(AppError::Forbidden(format!(
                "role {} may not {}",
                principal.role, action
            )))
        }
    }

    pub fn require_admin(&self, action: &str) -> Result<&Principal> {
        self.require_role(&[Role::Admin], action)
    }
}

impl From<Principal> for Caller {
    fn from(principal: Principal) -> Self {
        Caller::Authenticated(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_unauthenticated_not_forbidden() {
        let err = Caller::Anonymous
            .require_admin("toggle featured")
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[test]
    fn test_wrong_role_is_forbidden() {
        let caller: Caller = Principal::new("u-1", Role::Employer).into();
        let err = caller.require_admin("toggle featured").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("job-seeker".parse::<Role>().unwrap(), Role::Jobseeker);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("moderator".parse::<Role>().is_err());
    }
}
