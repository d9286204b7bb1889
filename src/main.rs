use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paid_meetings::application::coordinator::MeetingCoordinator;
use paid_meetings::config::Config;
use paid_meetings::domain::ports::{BookingClientBox, MeetingStoreRef};
use paid_meetings::infrastructure::http_booking::HttpBookingClient;
use paid_meetings::infrastructure::in_memory::InMemoryMeetingStore;
use paid_meetings::interfaces::http::{self, routes};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on. Overrides LISTEN_ADDR.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Env file to load instead of `.env` in the working directory.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.env_file.as_deref()).into_diagnostic()?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    // Pending meetings only live as long as the process
    let store: MeetingStoreRef = Arc::new(InMemoryMeetingStore::new());
    let booking: BookingClientBox =
        Box::new(HttpBookingClient::new(config.booking_options()).into_diagnostic()?);
    let coordinator = MeetingCoordinator::new(store, booking);

    let addr = config.listen_addr;
    let router = routes::router(routes::AppState {
        coordinator: Arc::new(coordinator),
        config: Arc::new(config),
    });

    http::serve(addr, router, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutting down");
    })
    .await
    .into_diagnostic()?;

    Ok(())
}
