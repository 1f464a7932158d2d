//! Fieldset CLI - render and fill admin panel fields from YAML definitions.
//!
//! Commands:
//! - `fieldset render --resource <name> --record <file> [--view <view>]`:
//!   print the serialized fields of a resource for one view
//! - `fieldset fill --resource <name> --request <file> [--model <file>]`:
//!   print the model after filling it from a request
//! - `fieldset list`: list resources and their field attributes
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldset_cli::commands;
use fieldset_cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("fieldset=debug,fieldset_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let definitions = cli.definitions.as_path();
    let result = match cli.command {
        Commands::Render {
            resource,
            record,
            view,
            request,
        } => {
            commands::run_render(definitions, &resource, &record, view, request.as_deref()).await
        }
        Commands::Fill {
            resource,
            request,
            model,
        } => commands::run_fill(definitions, &resource, &request, model.as_deref()).await,
        Commands::List => commands::run_list(definitions).await,
    };

    let exit_code = match result.and_then(|value| Ok(serde_json::to_string_pretty(&value)?)) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(exit_code);
}
