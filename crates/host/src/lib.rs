mod actor;
mod events;
mod packages;
mod session;
mod tasks;

pub use actor::{Actor, ActorDirectory, ActorId, ProcessLevel};
pub use events::{ScriptEvent, ScriptEventBus};
pub use packages::{PackageId, PackageRegistry};
pub use session::{
    run_session, FrameSink, HostFrame, HostServices, Scenario, ScenarioCommand, SessionConfig,
    SessionConfigError, SessionReport,
};
pub use tasks::{DeferredTask, TaskContext, TaskQueue};
