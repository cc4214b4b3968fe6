use std::process::ExitCode;

use host::{run_session, FrameSink};
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::demo::DemoScenario;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let mut scenario =
        DemoScenario::new(app.animation_handle.clone(), app.teammate_handle.clone());
    let sinks: Vec<Box<dyn FrameSink>> = vec![Box::new(app.animation), Box::new(app.teammate)];

    let report = match run_session(app.config, sinks, &mut scenario) {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "session_failed");
            return ExitCode::FAILURE;
        }
    };

    info!(
        frames_run = report.frames_run,
        events_emitted = report.events_emitted,
        tracked_teammates = app.teammate_handle.tracked_count(),
        "demo_finished"
    );
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(error = %err, "report_encode_failed");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
