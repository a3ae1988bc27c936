//! Static bearer-token auth gate
//!
//! Sessions are issued elsewhere; this gate only maps a presented token to
//! the principal it was configured for.

use async_trait::async_trait;
use jobboard_core::domain::{Caller, Principal, Role};
use jobboard_core::error::{AppError, Result};
use jobboard_core::port::AuthGate;
use std::collections::HashMap;
use tracing::debug;

/// Token table parsed from `token:user_id:role` entries separated by commas
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthGate {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenAuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    /// Parse `"t1:alice:employer,t2:root:admin"`; blank input yields an empty table
    pub fn parse(entries: &str) -> Result<Self> {
        let mut gate = Self::new();

        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [token, user_id, role] = parts.as_slice() else {
                return Err(AppError::Config(format!(
                    "token entry '{}' must look like token:user_id:role",
                    entry
                )));
            };
            if token.is_empty() || user_id.is_empty() {
                return Err(AppError::Config(format!(
                    "token entry '{}' has an empty token or user id",
                    entry
                )));
            }
            let role: Role = role
                .parse()
                .map_err(|e| AppError::Config(format!("token entry '{}': {}", entry, e)))?;

            gate.tokens
                .insert(token.to_string(), Principal::new(*user_id, role));
        }

        Ok(gate)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl AuthGate for StaticTokenAuthGate {
    async fn authenticate(&self, token: Option<&str>) -> Result<Caller> {
        let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
            None => return Ok(Caller::Anonymous),
            Some(t) => t,
        };

        match self.tokens.get(token) {
            Some(principal) => Ok(Caller::Authenticated(principal.clone())),
            None => {
                debug!("Rejected unknown token");
                Err(AppError::Unauthenticated)
            }
        }
    }
}
