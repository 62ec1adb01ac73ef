use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = navdispatch::logging::init_logging() {
        eprintln!("Warning: {e:#}");
    }

    match navdispatch::cli::run_cli() {
        Ok(output) => {
            match output.to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e:#}");
                    return ExitCode::from(2);
                }
            }
            if output.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
