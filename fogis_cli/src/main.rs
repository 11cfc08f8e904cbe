mod commands;
mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fogis_lib::fogis_api::RpcTransport;
use fogis_lib::{ClientConfig, Credentials, FogisClient, SessionToken};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "fogis")]
#[command(about = "Read and report match data on the FOGIS referee portal")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the session cookies as JSON
    Login,
    /// Check whether the saved session is still accepted
    Validate,
    /// List matches to report
    Matches(Box<commands::matches::MatchesArgs>),
    /// Show one match
    Match(commands::match_details::MatchArgs),
    /// List the players of a match
    Players(commands::match_details::MatchArgs),
    /// List the officials of a match
    Officials(commands::match_details::MatchArgs),
    /// List the reported events of a match
    Events(commands::match_details::MatchArgs),
    /// Show the reported result of a match
    #[command(name = "result")]
    MatchResult(commands::match_details::MatchArgs),
    /// List the known event type codes
    EventTypes,
}

/// Builds a client from `FOGIS_COOKIES` and/or `FOGIS_USERNAME` + `FOGIS_PASSWORD`.
fn client_from_env() -> Result<FogisClient> {
    let config = ClientConfig::from_env();

    let token = match std::env::var("FOGIS_COOKIES") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            serde_json::from_str::<SessionToken>(&raw)
                .context("FOGIS_COOKIES must be a JSON object of cookie names to values")?,
        ),
        _ => None,
    };
    let credentials = match (
        std::env::var("FOGIS_USERNAME"),
        std::env::var("FOGIS_PASSWORD"),
    ) {
        (Ok(user), Ok(pass)) if !user.is_empty() && !pass.is_empty() => {
            Some(Credentials::new(user, pass))
        }
        _ => None,
    };

    let transport = match (credentials, token) {
        (Some(credentials), Some(token)) => {
            RpcTransport::with_credentials_and_token(config, credentials, token)?
        }
        (Some(credentials), None) => RpcTransport::new(config, credentials)?,
        (None, Some(token)) => RpcTransport::with_token(config, token)?,
        (None, None) => bail!(
            "set FOGIS_USERNAME and FOGIS_PASSWORD, or FOGIS_COOKIES from an earlier `fogis login`"
        ),
    };
    Ok(FogisClient::from_transport(transport))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fogis=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    if let Commands::EventTypes = cli.command {
        commands::event_types::run(&format);
        return Ok(());
    }

    let client = client_from_env()?;

    use commands::match_details as details;
    match &cli.command {
        Commands::Login => commands::session::login(&client).await?,
        Commands::Validate => commands::session::validate(&client).await?,
        Commands::Matches(args) => commands::matches::run(args, &client, &format).await?,
        Commands::Match(args) => details::show_match(args, &client, &format).await?,
        Commands::Players(args) => details::players(args, &client, &format).await?,
        Commands::Officials(args) => details::officials(args, &client, &format).await?,
        Commands::Events(args) => details::events(args, &client, &format).await?,
        Commands::MatchResult(args) => details::result(args, &client, &format).await?,
        Commands::EventTypes => {}
    }

    Ok(())
}
