mod cli;
mod commands;
mod demo;
mod discover;
mod error;

use clap::Parser;

pub use cli::{Cli, Command};
pub use error::{print_error, UserFacingError};

/// Parse arguments from the process environment and run the requested
/// subcommand. Returns the process exit code: `0` on success, `1` on
/// any error (after printing it via [`print_error`]).
pub async fn run() -> i32 {
    betty_logging::init(betty_logging::Verbosity::Normal).ok();

    let cli = Cli::parse();
    match dispatch(&cli).await {
        Ok(()) => 0,
        Err(error) => {
            print_error(&error);
            1
        }
    }
}

async fn dispatch(cli: &Cli) -> Result<(), anyhow::Error> {
    match cli.command {
        Command::Generate => {
            let working_directory = std::env::current_dir()?;
            let configuration_file_path =
                discover::discover_configuration_file(&working_directory, cli.configuration.clone())?;
            commands::generate(&configuration_file_path).await
        }
        Command::Serve => {
            let working_directory = std::env::current_dir()?;
            let configuration_file_path =
                discover::discover_configuration_file(&working_directory, cli.configuration.clone())?;
            commands::serve(&configuration_file_path)
        }
        Command::ClearCaches => commands::clear_caches(),
        Command::Demo => {
            let (www_directory, directory) = commands::demo().await?;
            betty_logging::print_success(&format!(
                "Your demonstration site was generated in {}.",
                www_directory.display()
            ));
            // Keep the temporary project directory on disk instead of
            // deleting it on drop, so the generated site is still there
            // for the caller to serve or inspect afterwards.
            let _ = directory.into_path();
            Ok(())
        }
    }
}
