use std::fs::OpenOptions;
use std::sync::Arc;

use tokio::sync::{Notify, mpsc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use btcbar::config::{AppConfig, PriceSourceKind, fetch_config};
use btcbar::holdings::HoldingsStore;
use btcbar::poller::{spawn_rate_updater, spawn_spot_poller};
use btcbar::prompt::select_prompt;
use btcbar::rest::CoinbaseClient;
use btcbar::state::TrackerState;
use btcbar::tls::build_tls_config;
use btcbar::tui::event::{spawn_event_reader, spawn_shutdown_listener, spawn_tick_timer};
use btcbar::tui::{self, ActionHandler, App, Message};
use btcbar::websocket::ConnectionManager;
use btcbar::{BtcBarError, Result};

/// Redraw cadence for the "updated Ns ago" label.
const TICK_INTERVAL_MS: u64 = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = fetch_config()?;
    std::fs::create_dir_all(&app_config.data_dir)?;
    init_logging(&app_config)?;

    let tls_config = Arc::new(build_tls_config(app_config.ca_bundle.as_deref())?);
    let client = CoinbaseClient::new(&app_config.price.rest_url, tls_config.clone())?;

    let store = HoldingsStore::in_dir(&app_config.data_dir);
    let holdings = store.load();
    info!(holdings, path = %store.path().display(), "Loaded holdings");

    let tracker = TrackerState::new(holdings, app_config.fx.quote.clone());
    let prompt = select_prompt(app_config.prompt);
    let mut app = App::new(
        tracker,
        app_config.price.base_asset(),
        app_config.price.quote_currency(),
        app_config.price.source,
        prompt.is_some(),
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut refresh = Vec::new();

    match app_config.price.source {
        PriceSourceKind::Stream => {
            let manager = ConnectionManager::new(
                app_config.price.websocket_url.clone(),
                vec![app_config.price.product_id.clone()],
                tls_config.clone(),
                tx.clone(),
            );
            tokio::spawn(manager.run());
        }
        PriceSourceKind::Poll => {
            let notify = Arc::new(Notify::new());
            spawn_spot_poller(
                client.clone(),
                app_config.price.spot_pair.clone(),
                app_config.price.poll_interval,
                notify.clone(),
                tx.clone(),
            );
            refresh.push(notify);
        }
    }

    if app_config.price.quote_currency() != app_config.fx.quote {
        let notify = Arc::new(Notify::new());
        spawn_rate_updater(
            client,
            app_config.fx.base.clone(),
            app_config.fx.quote.clone(),
            app_config.fx.interval,
            notify.clone(),
            tx.clone(),
        );
        refresh.push(notify);
    }

    let handler = ActionHandler::new(store, refresh, prompt, tx.clone());

    tui::install_panic_hook();
    let mut terminal = tui::setup_terminal()?;
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), TICK_INTERVAL_MS);
    spawn_shutdown_listener(tx);

    let result = tui::run(&mut terminal, &mut app, &mut rx, &handler).await;
    tui::restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!("UI loop failed: {e}");
    }
    info!("Shutting down");
    result
}

/// Sends tracing output to `<data_dir>/btcbar.log`; the terminal belongs
/// to the UI.
fn init_logging(app_config: &AppConfig) -> Result<()> {
    let path = app_config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| BtcBarError::Io(format!("cannot open log file {}: {e}", path.display())))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
