// Application Layer - Use Cases and Business Logic

pub mod apply;
pub mod company;
pub mod constants;
pub mod expiry;
pub mod lifecycle;
pub mod stop_signal;

#[cfg(test)]
pub(crate) mod memory;

// Re-exports
pub use apply::{ApplicationService, ApplyRequest};
pub use company::{CompanyService, CreateCompanyRequest};
pub use expiry::{ExpirySweeper, SweepMode, SweeperHandle};
pub use lifecycle::{
    CreateJobRequest, JobLifecycleEngine, JobStats, SearchCriteria, UpdateJobRequest,
};
pub use stop_signal::{stop_signal, StopSignal, StopTrigger};
