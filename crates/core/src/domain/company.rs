// Company Domain Model

use crate::domain::job::{CompanyId, UserId};
use serde::{Deserialize, Serialize};

/// Company owning job postings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: i64, // epoch ms
}

impl Company {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        name: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_id: owner_id.into(),
            created_at,
        }
    }
}
