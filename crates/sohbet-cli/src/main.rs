use std::fs::OpenOptions;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use sohbet_term::{AppStateProps, BackendManager, Config, ConfigKey};

#[derive(Parser, Debug)]
#[clap(
    name = "sohbet",
    author,
    version = "0.1.0",
    about = "Terminal client for a retrieval-augmented chat backend"
)]
struct Cli {
    #[clap(long, help = "Base address of the chat endpoint")]
    chat_url: Option<String>,

    #[clap(long, help = "Base address of the document upload endpoint")]
    upload_url: Option<String>,

    #[clap(long, short, help = "Model selected at startup, see /models")]
    model: Option<String>,

    #[clap(long, short, help = "Log level: error, warn, info, debug or trace")]
    log_level: Option<String>,

    #[clap(long, short, help = "Path to the configuration file")]
    config_file: Option<String>,

    #[clap(long, default_value = "sohbet.log", help = "File that receives log output")]
    log_file: String,

    #[clap(long, help = "Print assistant replies as rendered HTML fragments")]
    render_html: bool,

    #[clap(long, help = "Print a commented config.toml with every default and exit")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", Config::serialize_default());
        return Ok(());
    }

    let config = Config::load(&[
        (ConfigKey::ChatUrl, cli.chat_url),
        (ConfigKey::UploadUrl, cli.upload_url),
        (ConfigKey::Model, cli.model),
        (ConfigKey::LogLevel, cli.log_level),
        (ConfigKey::ConfigFile, cli.config_file),
    ])
    .await?;

    // Logs go to a file so they do not interleave with the conversation.
    let log_level_filter = config
        .get(ConfigKey::LogLevel)
        .parse()
        .unwrap_or(LevelFilter::Info);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("failed to open log file {}", cli.log_file))?;
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let backend = BackendManager::get(&config)?;
    log::info!(
        "starting with chat-url={} upload-url={} model={}",
        config.get(ConfigKey::ChatUrl),
        config.get(ConfigKey::UploadUrl),
        config.model()
    );

    sohbet_term::start_loop(
        backend,
        AppStateProps {
            model: config.model(),
        },
        cli.render_html,
    )
    .await?;

    return Ok(());
}
