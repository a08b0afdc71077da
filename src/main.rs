use std::process::ExitCode;

use qbc::ui::output;

fn main() -> ExitCode {
    match qbc::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
