use crate::arguments::ModuleArgs;
use crate::cli::handlers;
use crate::config::ModuleDefaults;
use crate::error::{ModuleError, Result};
use crate::result::{ModuleResult, ModuleSuccess};
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use keycloak_common::ConfigLoader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Retrieve an authentication token from Keycloak
#[derive(Parser, Debug)]
#[command(
    name = "get_token",
    version,
    about = "Ansible binary module retrieving a Keycloak authentication token",
    long_about = "Ansible binary module retrieving a Keycloak authentication token.

Ansible runs the module with the path of a JSON file holding the task
arguments and reads a single JSON result from stdout.

EXAMPLE:
  echo '{\"url\": \"https://auth.example.com/auth\", \"auth_realm\": \"master\",
         \"username\": \"admin\", \"password\": \"secret\"}' > args.json
  get_token args.json"
)]
pub struct Args {
    /// JSON file with the task arguments
    pub args_file: PathBuf,

    /// Configuration file with module defaults
    #[arg(short, long, env = "KEYCLOAK_MODULE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,
}

impl Args {
    /// Execute the module and build the result Ansible will read
    pub async fn run(&self) -> ModuleResult {
        ModuleResult::from(self.execute().await)
    }

    async fn execute(&self) -> Result<ModuleSuccess> {
        let defaults = ModuleDefaults::load(self.config.clone())?;
        debug!(?defaults, "Loaded module defaults");

        let module_args = read_args_file(&self.args_file).await?;
        handlers::token::handle_get_token(&module_args, &defaults).await
    }
}

async fn read_args_file(path: &Path) -> Result<ModuleArgs> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ModuleError::ArgsFile {
            path: path.display().to_string(),
            source,
        })?;
    ModuleArgs::parse(&text)
}
