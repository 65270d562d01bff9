pub mod controller;
pub mod events;

pub use controller::ReportWorkflow;
pub use events::{EventBus, WorkflowEvent};
