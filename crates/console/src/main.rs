use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use stockscreen_core::events::NotificationKind;
use stockscreen_core::fetch::HttpStockListFetcher;
use stockscreen_core::screen::SearchScreen;
use stockscreen_core::view::{ScreenView, ViewBody};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "stockscreen_console")]
struct Args {
    /// Base address of the stock list endpoint. Overrides STOCKS_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Path of the stock list endpoint. Overrides STOCKS_LIST_PATH.
    #[arg(long)]
    path: Option<String>,

    /// Run a single search, print the results and exit.
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = stockscreen_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(path) = args.path {
        settings.list_path = path;
    }

    let fetcher = HttpStockListFetcher::from_settings(&settings)?;
    tracing::info!(url = fetcher.url(), "starting search screen");
    let screen = SearchScreen::new(&settings, Arc::new(fetcher));

    match args.query {
        Some(query) => run_once(screen, query, settings.debounce).await,
        None => run_interactive(screen).await,
    }
}

async fn run_once(screen: SearchScreen, query: String, debounce: Duration) -> anyhow::Result<()> {
    let _results = screen.results();
    let mut state = screen.fetch_state();
    let mut notifications = screen.subscribe_notifications();

    screen.on_search_text_change(query);

    tokio::select! {
        res = state.wait_for(|s| s.generation > 0) => {
            res.context("stock list store went away")?;
        }
        res = notifications.wait_for(|pending| !pending.is_empty()) => {
            res.context("notification channel went away")?;
        }
    }

    // Let the query clear the debounce window against the loaded list.
    tokio::time::sleep(debounce + Duration::from_millis(50)).await;

    drain_notifications(&screen);
    print_view(&screen.view());
    screen.close();
    Ok(())
}

async fn run_interactive(screen: SearchScreen) -> anyhow::Result<()> {
    let mut results = screen.results();
    let mut state = screen.fetch_state();
    let mut notifications = screen.subscribe_notifications();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Search Stocks (enter a query, empty line clears, :q quits)");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read stdin")? {
                    Some(line) if line.trim() == ":q" => break,
                    Some(line) => screen.on_search_text_change(line),
                    None => break,
                }
            }
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                results.borrow_and_update();
                print_view(&screen.view());
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                if state.borrow_and_update().is_loading {
                    println!("Loading...");
                }
            }
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }
                notifications.borrow_and_update();
                drain_notifications(&screen);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    screen.close();
    Ok(())
}

/// Shows every pending notification once, then acknowledges it.
fn drain_notifications(screen: &SearchScreen) {
    for notification in screen.notifications() {
        if let NotificationKind::ShowError { cause: Some(cause) } = &notification.kind {
            sentry_anyhow::capture_anyhow(cause);
        }
        eprintln!("! {}", notification.display_text());
        screen.acknowledge(notification.id);
    }
}

fn print_view(view: &ScreenView) {
    if view.loading {
        println!("Loading...");
    }
    match &view.body {
        ViewBody::Empty { title, hint } => println!("{title}\n{hint}"),
        ViewBody::Searching => println!("Searching..."),
        ViewBody::Results(rows) => {
            for row in rows {
                let cells: Vec<&str> = [
                    row.ticker.as_deref(),
                    row.name.as_deref(),
                    row.price.as_deref(),
                ]
                .into_iter()
                .flatten()
                .collect();
                println!("{}", cells.join("  "));
            }
        }
    }
}

fn init_sentry(settings: &stockscreen_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
