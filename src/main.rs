use std::process::ExitCode;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use streamchat::adapters::ReqwestHttpClient;
use streamchat::cli::{handle_version_command, parse_args, run_chat, CancelSlot, CliCommand, USAGE};
use streamchat::config::ChatConfig;
use streamchat::conversation::Conversation;

/// Environment variable holding the log filter, e.g. `streamchat=debug`.
const LOG_ENV: &str = "STREAMCHAT_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("streamchat: {}\n\n{}", e, USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    let (attachments, prompt) = match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(ExitCode::SUCCESS);
        }
        CliCommand::Chat {
            attachments,
            prompt,
        } => (attachments, prompt),
    };

    color_eyre::install()?;
    init_tracing();

    let config = ChatConfig::from_env();
    tracing::debug!("Using {:?}", config);

    let cancel = CancelSlot::new();
    cancel.install_handler()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let conversation = Conversation::new(ReqwestHttpClient::new(), config);
    runtime.block_on(run_chat(conversation, cancel, &attachments, prompt))
}
