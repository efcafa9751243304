pub mod retry;
pub mod service;
pub mod task;

pub use retry::{RetryPolicy, Transient};
pub use service::{RefreshReport, RefreshService};
pub use task::start_refresh_task;
