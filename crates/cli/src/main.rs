use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartsense_core::client::{AnalysisApi, HttpAnalysisApi};
use chartsense_core::render;
use chartsense_core::session::SessionDriver;

mod screen;

#[derive(Debug, Parser)]
#[command(name = "chartsense")]
struct Args {
    /// Base URL of the technical analysis API. Defaults to CHARTSENSE_API_URL.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up symbols matching a query.
    Search { query: String },
    /// Run technical analysis for one symbol.
    Analyze { symbol: String },
    /// Search, pick and analyze from a prompt.
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = chartsense_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let base_url = match args.base_url {
        Some(url) => url,
        None => settings.require_api_base_url()?.to_string(),
    };
    let api = Arc::new(HttpAnalysisApi::new(
        base_url,
        settings.search_timeout(),
        settings.analyze_timeout(),
    )?);
    tracing::debug!(base_url = api.base_url(), "analysis api configured");

    match args.command {
        Command::Search { query } => {
            let mut driver = SessionDriver::new(api);
            driver.type_query(&query);
            driver.settle().await;
            screen::print_session(&render::session_view(driver.session()));
        }
        Command::Analyze { symbol } => {
            let result = api.analyze(&symbol).await;
            screen::print_result(&render::result_view(&result));
        }
        Command::Interactive => interactive(api).await?,
    }

    Ok(())
}

enum Input {
    Type(String),
    Pick(usize),
    Analyze,
    Clear,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let Some(cmd) = line.strip_prefix(':') else {
        return Input::Type(line.to_string());
    };
    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("pick"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Pick(n - 1),
            _ => Input::Unknown(line.to_string()),
        },
        (Some("analyze"), None) => Input::Analyze,
        (Some("clear") | Some("tap"), None) => Input::Clear,
        (Some("quit") | Some("q"), None) => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

async fn interactive(api: Arc<HttpAnalysisApi>) -> anyhow::Result<()> {
    let mut driver = SessionDriver::new(api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    screen::print_help();
    screen::print_session(&render::session_view(driver.session()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Type(text) => driver.type_query(&text),
                    Input::Pick(idx) => {
                        if !driver.select_index(idx) {
                            println!("no suggestion #{}", idx + 1);
                            continue;
                        }
                    }
                    Input::Analyze => {
                        if !driver.request_analysis() {
                            println!("pick a suggestion first");
                            continue;
                        }
                    }
                    Input::Clear => driver.reset(),
                    Input::Quit => break,
                    Input::Unknown(raw) => {
                        println!("unknown command: {raw}");
                        screen::print_help();
                        continue;
                    }
                }
            }
            changed = driver.next_completion() => {
                if !changed {
                    continue;
                }
            }
        }

        screen::print_session(&render::session_view(driver.session()));
    }

    Ok(())
}

fn init_sentry(settings: &chartsense_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
