use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use sms_threads::backend::{Fixture, InMemoryBackend, MessagingBackend};
use sms_threads::cli::{HELP, Input, Session};
use sms_threads::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let backend = match &config.fixture_path {
        Some(path) => Fixture::load(path)
            .with_context(|| format!("failed to load fixture {}", path.display()))?
            .into_backend()
            .await,
        None => InMemoryBackend::new(),
    };
    if let Some(permission) = config.permission {
        backend.set_permission(permission).await;
    }
    let backend: Arc<dyn MessagingBackend> = Arc::new(backend);

    eprintln!("sms-threads v{}", env!("CARGO_PKG_VERSION"));
    match &config.fixture_path {
        Some(path) => eprintln!("   Device: {}", path.display()),
        None => eprintln!("   Device: empty (set SMS_FIXTURE_PATH to load one)"),
    }
    eprintln!("   Type 'help' for commands.\n");

    let mut session = Session::new(backend, config.preview_chars);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprint!("> ");
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break, // EOF
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }

        match Input::parse(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Run(command)) => match session.execute(command).await {
                Ok(out) => println!("{}\n", out),
                Err(e) => eprintln!("error [{}]: {}", e.label(), e),
            },
            Err(hint) => eprintln!("{}\n{}", hint, HELP),
        }
        eprint!("> ");
    }

    Ok(())
}
