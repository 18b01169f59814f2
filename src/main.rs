use anyhow::{Context, Result};
use callscreen::{
    create_router, AppState, CandidateProfile, Config, Dialer, GeminiModel, MongoScreenStore,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "callscreen", about = "Automated phone-screen interviewer")]
struct Cli {
    /// Config file (without extension), resolved by the config loader.
    #[arg(long, default_value = "config/callscreen")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP/WebSocket server (default).
    Serve,
    /// Place the outbound screening call and exit.
    Dial {
        /// Number to call; defaults to the candidate profile's number.
        #[arg(long)]
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    info!("{} starting", config.service.name);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Dial { to } => dial(config, to).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let candidate = Arc::new(CandidateProfile::load(&config.candidate.path)?);
    info!("Screening candidate {}", candidate.uid);

    let model = Arc::new(GeminiModel::new(config.model.clone())?);
    let store = Arc::new(MongoScreenStore::connect(&config.store).await?);
    let dialer = Arc::new(Dialer::new(config.telephony.clone())?);

    let addr = format!("{}:{}", config.service.http.bind, config.service.http.port);
    let state = AppState::new(Arc::new(config), model, store, candidate, dialer);
    let router = create_router(state);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn dial(config: Config, to: Option<String>) -> Result<()> {
    let candidate = CandidateProfile::load(&config.candidate.path)?;

    let to = to
        .or(candidate.phone)
        .context("No number to dial: none given and candidate has no phone")?;

    let dialer = Dialer::new(config.telephony)?;
    let call_sid = dialer.dial(&to).await?;

    info!("Screening call placed: {}", call_sid);

    Ok(())
}
