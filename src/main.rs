use std::process::ExitCode;

fn main() -> ExitCode {
    handoff::app::startup::startup()
}
