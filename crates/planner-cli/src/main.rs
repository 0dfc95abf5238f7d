use std::process::ExitCode;

fn main() -> ExitCode {
    match planner_core::run(std::env::args_os().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("planner: {err:#}");
            ExitCode::FAILURE
        }
    }
}
