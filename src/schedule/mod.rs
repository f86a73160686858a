pub mod types;
pub mod scheduler;
mod allocator;
mod residual;

pub use types::{AssignmentBoard, Availability, Person, PersonStats, Warning, WarningKind, WarningLog};
pub use scheduler::{Schedule, Scheduler};
