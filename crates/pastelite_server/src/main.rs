//! PasteLite server entrypoint.

use chrono::Utc;
use pastelite_core::config::env_flag_enabled;
use pastelite_core::{DEFAULT_PORT, DEFAULT_REAP_INTERVAL_SECS};
use pastelite_server::{
    resolve_bind_address, serve_router, spawn_reaper, AppState, Config, Database, PasteStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    sweep: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" => flags.help = true,
            "--sweep" => flags.sweep = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pastelite=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    let store = Arc::new(PasteStore::new(database));

    if cli_flags.sweep {
        let removed = store.delete_expired(Utc::now())?;
        println!("Removed {} expired paste(s)", removed);
        return Ok(());
    }

    if config.test_mode {
        tracing::warn!("TEST_MODE enabled - requests may override the clock via x-test-now-ms");
    }

    let reaper = spawn_reaper(Arc::clone(&store), config.reap_interval());
    let state = AppState::with_store(config.clone(), store);

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("PasteLite running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    reaper.shutdown().await;
    tracing::info!("Server stopped");

    serve_result?;

    Ok(())
}

fn print_help() {
    println!("PasteLite Server\n");
    println!("Usage: pastelite [OPTIONS]\n");
    println!("Options:");
    println!("  --sweep           Remove expired pastes once and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH              Database directory (default: ~/.cache/pastelite/db)");
    println!(
        "  PORT                 Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  MAX_PASTE_SIZE       Maximum paste size in bytes (default: 1MB)");
    println!(
        "  REAP_INTERVAL_SECS   Seconds between expiry sweeps (default: {})",
        DEFAULT_REAP_INTERVAL_SECS
    );
    println!("  PUBLIC_URL           Base URL used in share links");
    println!("  TEST_MODE            Honor the x-test-now-ms request header");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin and non-loopback binds");
    println!(
        "  BIND                 Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["pastelite".to_string(), "--swep".to_string()],
                "Unknown option",
            ),
            (
                vec!["pastelite".to_string(), "sweep".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let args = vec![
            "pastelite".to_string(),
            "--help".to_string(),
            "--sweep".to_string(),
        ];
        let flags = parse_cli_flags(&args).expect("known options should parse");
        assert_eq!(
            flags,
            CliFlags {
                help: true,
                sweep: true,
            }
        );
        assert_eq!(
            parse_cli_flags(&["pastelite".to_string()]).expect("no flags"),
            CliFlags::default()
        );
    }
}
