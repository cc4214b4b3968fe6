use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::actor::ActorDirectory;
use crate::events::{ScriptEvent, ScriptEventBus};
use crate::packages::PackageRegistry;
use crate::tasks::{TaskContext, TaskQueue};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub frame_interval: Duration,
    pub max_frames: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
            max_frames: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionConfigError {
    #[error("frame interval must be non-zero")]
    ZeroFrameInterval,
    #[error("session must run at least one frame")]
    ZeroFrameBudget,
}

impl SessionConfig {
    fn validate(&self) -> Result<(), SessionConfigError> {
        if self.frame_interval.is_zero() {
            return Err(SessionConfigError::ZeroFrameInterval);
        }
        if self.max_frames == 0 {
            return Err(SessionConfigError::ZeroFrameBudget);
        }
        Ok(())
    }
}

/// Host-owned state the scenario mutates and deferred tasks operate on.
#[derive(Debug, Default)]
pub struct HostServices {
    pub actors: ActorDirectory,
    pub packages: PackageRegistry,
    pub events: ScriptEventBus,
}

/// Per-frame view handed to sinks. The frame context may read the live
/// actor population and submit deferred work; it must not mutate the host
/// directly.
pub struct HostFrame<'a> {
    pub now: Instant,
    pub actors: &'a ActorDirectory,
    pub tasks: &'a TaskQueue,
}

/// Subscribe-once per-frame callback. Registered sinks are invoked on
/// every frame for the life of the session.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &HostFrame<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioCommand {
    Continue,
    Stop,
}

/// Drives the simulated engine side of a session: world setup, then
/// arbitrary host mutation once per frame before the sinks run.
pub trait Scenario {
    fn setup(&mut self, host: &mut HostServices);
    fn on_frame(&mut self, frame_index: u64, host: &mut HostServices) -> ScenarioCommand;
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub frames_run: u64,
    pub events_emitted: u64,
    pub script_events: Vec<ScriptEvent>,
}

/// Runs the frame loop over a virtual clock: each frame advances `now` by
/// exactly one frame interval. Frame order is scenario mutation, then
/// every sink, then a FIFO drain of the deferred task queue.
pub fn run_session(
    config: SessionConfig,
    mut sinks: Vec<Box<dyn FrameSink>>,
    scenario: &mut dyn Scenario,
) -> Result<SessionReport, SessionConfigError> {
    config.validate()?;

    let mut services = HostServices::default();
    let tasks = TaskQueue::default();
    scenario.setup(&mut services);
    info!(
        frame_interval_ms = config.frame_interval.as_millis() as u64,
        max_frames = config.max_frames,
        sink_count = sinks.len(),
        actor_count = services.actors.actor_count(),
        "session_started"
    );

    let mut now = Instant::now();
    let mut frames_run = 0u64;
    for frame_index in 0..config.max_frames {
        let command = scenario.on_frame(frame_index, &mut services);

        for sink in sinks.iter_mut() {
            let frame = HostFrame {
                now,
                actors: &services.actors,
                tasks: &tasks,
            };
            sink.on_frame(&frame);
        }

        let drained = tasks.drain();
        if !drained.is_empty() {
            debug!(frame_index, task_count = drained.len(), "tasks_drained");
        }
        for task in drained {
            let mut ctx = TaskContext {
                now,
                actors: &mut services.actors,
                packages: &services.packages,
                events: &mut services.events,
            };
            task(&mut ctx);
        }

        frames_run = frames_run.saturating_add(1);
        if command == ScenarioCommand::Stop {
            debug!(frame_index, "scenario_stop_requested");
            break;
        }
        now += config.frame_interval;
    }

    let events_emitted = services.events.total_emitted();
    info!(frames_run, events_emitted, "session_finished");
    Ok(SessionReport {
        frames_run,
        events_emitted,
        script_events: services.events.drain(),
    })
}
