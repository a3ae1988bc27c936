// Auth Gate Port
// Session issuance lives outside this system; the gate only classifies callers.

use crate::domain::Caller;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AuthGate: Send + Sync {
    /// Classify a request by its bearer token
    ///
    /// No token yields `Caller::Anonymous`; a token the gate does not
    /// recognise is `AppError::Unauthenticated`.
    async fn authenticate(&self, token: Option<&str>) -> Result<Caller>;
}
