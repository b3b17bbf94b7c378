pub mod context;
pub mod factory;
pub mod report;
pub mod result;
pub mod scheduler;
pub mod visit_queue;
pub mod walker;

pub use context::{AbilityContext, GraphHandle};
pub use factory::SchedulerFactory;
pub use report::{ReportCollector, Reports};
pub use result::{RunResult, RunStatus};
pub use scheduler::{SchedulerOptions, WalkerScheduler};
pub use visit_queue::VisitQueue;
pub use walker::{Lifecycle, WalkerState};
