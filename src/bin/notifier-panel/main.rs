use std::sync::Arc;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use notifier_panel::{config::Config, page::HtmlFile, Panel};

mod command;
use command::{Command, USAGE};

fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from([".dev.env"]);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notifier_panel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("cannot start the runtime")?
        .block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let panel = Panel::start(&config, Arc::new(HtmlFile::new(&config.output)));
    tracing::info!(page = %panel.page().path().display(), "writing page");
    eprintln!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("cannot read stdin")? {
        match Command::parse(&line) {
            Ok(Some(Command::Send(mut form))) => {
                panel.submit(&mut form).await;
            }
            Ok(Some(Command::Status(id))) => panel.check_status(&id).await,
            Ok(Some(Command::Cancel(id))) => panel.cancel(&id).await,
            Ok(Some(Command::Quit)) => break,
            Ok(None) => {}
            Err(err) => eprintln!("{err}\n{USAGE}"),
        }
    }

    panel.shutdown().await;
    Ok(())
}
