//! Main entry point for the get_token module

use clap::Parser;
use keycloak_module::cli::Args;
use keycloak_module::output;
use keycloak_module::result::{ModuleFailure, ModuleResult};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let failure = ModuleResult::Failure(ModuleFailure::new(e.render().to_string()));
            return finish(&failure);
        }
    };

    // Initialize logging here in the binary context where CARGO_BIN_NAME is available
    let binary_name = env!("CARGO_BIN_NAME").replace('-', "_");
    let default_filter = format!("{binary_name}=warn,keycloak_sdk=warn");
    if let Err(e) = keycloak_common::logging::init_module_logging(&args.verbosity, &default_filter) {
        let failure = ModuleResult::Failure(ModuleFailure::new(format!(
            "Failed to initialize logging: {e}"
        )));
        return finish(&failure);
    }

    let result = args.run().await;
    finish(&result)
}

fn finish(result: &ModuleResult) -> ExitCode {
    if let Err(e) = output::emit(result) {
        eprintln!("Failed to write module result: {e}");
        return ExitCode::FAILURE;
    }
    if result.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
