use std::process::ExitCode;

fn main() -> ExitCode {
    match codescribe_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("codescribe: {e}");
            ExitCode::FAILURE
        }
    }
}
