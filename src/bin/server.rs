use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::UtcOffset;
use tower_http::trace::TraceLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use finflow::{
    AppState, build_router,
    clock::SystemClock,
    db::initialize,
    graceful_shutdown,
    models::UserId,
    providers::{
        FileSlotStore, LocalProvider, RemoteProvider, SqliteTransactionTable, TransactionProvider,
    },
    timezone::get_local_offset,
};

/// The JSON API server for FinFlow.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Serve a guest session backed by local slot files instead of the
    /// application database.
    #[arg(long)]
    guest: bool,

    /// Directory where guest session slot files are kept.
    #[arg(long, default_value = ".finflow")]
    data_dir: PathBuf,

    /// File path to the application SQLite database.
    #[arg(long, required_unless_present = "guest")]
    db_path: Option<String>,

    /// The identity that owns transactions created through the API.
    ///
    /// Without this, creating transactions is rejected with 401.
    #[arg(long)]
    user: Option<String>,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// A canonical timezone name (e.g. "Pacific/Auckland") used to resolve
    /// local calendar dates.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let Some(local_offset) = get_local_offset(&args.timezone) else {
        tracing::error!("\"{}\" is not a canonical timezone name.", args.timezone);
        std::process::exit(1);
    };

    if args.guest {
        let store =
            FileSlotStore::new(&args.data_dir).expect("Could not create the guest data directory.");
        let provider = LocalProvider::new(store, SystemClock);

        tracing::info!(
            "Serving a guest session from {}.",
            args.data_dir.display()
        );
        serve(provider, local_offset, args.port).await;
    } else {
        let db_path = args
            .db_path
            .expect("--db-path is required unless --guest is set.");
        let connection =
            Connection::open(&db_path).expect("Could not open the application database.");
        initialize(&connection).expect("Could not initialize the application database.");

        let identity = args.user.map(UserId::new);

        if identity.is_none() {
            tracing::warn!("No --user was given, creating transactions will be rejected.");
        }

        let table = SqliteTransactionTable::new(Arc::new(Mutex::new(connection)));
        let provider = RemoteProvider::new(table, identity);

        serve(provider, local_offset, args.port).await;
    }
}

async fn serve<P>(provider: P, local_offset: UtcOffset, port: u16)
where
    P: TransactionProvider + Clone + Send + Sync + 'static,
{
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let state = AppState::new(provider, local_offset);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Could not start the server.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they arise, so skip the default 5xx log.
        .on_failure(());

    router.layer(tracing_layer)
}
