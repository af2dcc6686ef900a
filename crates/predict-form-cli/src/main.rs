//! predict-form — entry point.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use predict_form::CoercionPolicy;
use predict_form_cli::cli::{self, output, parse_assignment, DEFAULT_FORM_ID};
use predict_form_cli::config::{load_config, resolve_config_path, resolve_endpoint};

#[derive(Parser)]
#[command(
    name = "predict-form",
    about = "Submit a form's numeric fields to a price prediction endpoint",
    version
)]
struct Cli {
    /// Prediction endpoint URL (overrides PREDICT_FORM_ENDPOINT and the config file).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Path to config.json (overrides PREDICT_FORM_CONFIG).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output results as JSON (machine-readable).
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the form comes from and what the user typed into it.
#[derive(Args)]
struct FormArgs {
    /// HTML page containing the form.
    #[arg(long)]
    page: Option<PathBuf>,

    /// `id` of the form element on the page.
    #[arg(long, default_value = DEFAULT_FORM_ID)]
    form_id: String,

    /// Field value as NAME=VALUE. Repeatable. Overrides the page's value.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    sets: Vec<(String, String)>,

    /// What to do with non-numeric values: propagate, reject, or default=<number>.
    #[arg(long, default_value = "propagate")]
    coercion: CoercionPolicy,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the form and print the predicted price.
    Submit {
        #[command(flatten)]
        form: FormArgs,

        /// Request timeout in milliseconds (none by default).
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Print the JSON body a submit would send, without sending it.
    Payload {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Probe the backend's /health endpoint.
    Health {
        /// Request timeout in milliseconds (none by default).
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show the resolved configuration.
    Config,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   predict-form completions bash > ~/.local/share/bash-completion/completions/predict-form
    ///   predict-form completions zsh > ~/.zfunc/_predict-form
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    output::set_json(cli.json);

    let config_arg = cli.config.as_deref();
    let endpoint_arg = cli.endpoint.as_deref();

    match cli.command {
        Commands::Submit { form, timeout_ms } => {
            let (_, endpoint) = resolve_settings(config_arg, endpoint_arg)?;
            let source = cli::load_form(form.page.as_deref(), &form.form_id, &form.sets)?;
            cli::submit_cmd::run(&endpoint, source.as_ref(), form.coercion, timeout_ms).await?;
        }

        Commands::Payload { form } => {
            let source = cli::load_form(form.page.as_deref(), &form.form_id, &form.sets)?;
            cli::payload_cmd::run(source.as_ref(), form.coercion)?;
        }

        Commands::Health { timeout_ms } => {
            let (_, endpoint) = resolve_settings(config_arg, endpoint_arg)?;
            cli::health_cmd::run(&endpoint, timeout_ms).await?;
        }

        Commands::Config => {
            let (config_path, endpoint) = resolve_settings(config_arg, endpoint_arg)?;
            cli::config_cmd::run(&config_path, &endpoint)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "predict-form", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Config file path and endpoint. Only commands that talk to the backend
/// read the config file.
fn resolve_settings(
    config_arg: Option<&str>,
    endpoint_arg: Option<&str>,
) -> anyhow::Result<(PathBuf, String)> {
    let config_path = resolve_config_path(config_arg);
    let config = load_config(&config_path)?;
    let endpoint = resolve_endpoint(endpoint_arg, &config);
    Ok((config_path, endpoint))
}
