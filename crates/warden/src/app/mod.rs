use std::process::ExitCode;

mod bootstrap;
mod demo;
mod loop_runner;
mod reconcile;
mod settings;

pub(crate) fn run() -> ExitCode {
    let app = bootstrap::build_app();
    loop_runner::run(app)
}
