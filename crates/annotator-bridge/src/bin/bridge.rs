use std::sync::Arc;
use std::time::Duration;

use annotator_bridge::reconnect::{Outcome, ReconnectState};
use annotator_bridge::{stdio, BridgeConfig, CliArgs, Command};
use clap::Parser;
use tokio::sync::{watch, Notify};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const INITIAL_CONNECT_DEADLINE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = CliArgs::parse();
    let Command::Mcp { verbose, .. } = &args.command;
    let verbose = *verbose;

    let config = match BridgeConfig::resolve(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("annotator-bridge: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let default_level = if verbose { "annotator_bridge=debug" } else { "annotator_bridge=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let shutdown = Arc::new(Notify::new());
    tokio::spawn(watch_signals(shutdown.clone()));
    let retry_now = Arc::new(Notify::new());

    let first_connect = tokio::time::timeout(INITIAL_CONNECT_DEADLINE, stdio::connect(&config.socket_url)).await;
    let mut current_peer = match first_connect {
        Ok(Ok(peer)) => peer,
        Ok(Err(err)) => {
            eprintln!("annotator-bridge: could not connect to {}: {err}", config.socket_url);
            return std::process::ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("annotator-bridge: connecting to {} timed out", config.socket_url);
            return std::process::ExitCode::FAILURE;
        }
    };
    info!(url = %config.socket_url, "connected to hub");

    // The stdin loop runs independently of reconnection state: it always
    // dispatches against whatever peer `peer_rx` currently holds, so a tool
    // call arriving mid-outage is answered immediately instead of queuing
    // behind a backoff sleep.
    let (peer_tx, peer_rx) = watch::channel(current_peer.clone());
    let mut stdin_task = tokio::spawn(stdio::pump(peer_rx, retry_now.clone()));

    let mut reconnect = ReconnectState::new(shutdown.clone(), retry_now.clone());

    loop {
        tokio::select! {
            result = &mut stdin_task => {
                return match result {
                    Ok(Ok(())) => {
                        info!("stdin closed, shutting down");
                        std::process::ExitCode::SUCCESS
                    }
                    Ok(Err(err)) => {
                        error!(%err, "stdin loop failed");
                        std::process::ExitCode::FAILURE
                    }
                    Err(err) => {
                        error!(%err, "stdin task panicked");
                        std::process::ExitCode::FAILURE
                    }
                };
            }
            _ = stdio::disconnect_watch(&current_peer) => {
                warn!("lost connection to hub, reconnecting");
            }
            _ = shutdown.notified() => {
                stdin_task.abort();
                info!("shutdown signal received");
                return std::process::ExitCode::SUCCESS;
            }
        }

        loop {
            match reconnect.backoff().await {
                Outcome::ShuttingDown => {
                    stdin_task.abort();
                    return std::process::ExitCode::SUCCESS;
                }
                Outcome::BudgetExhausted => {
                    error!("exhausted reconnect attempts, giving up");
                    stdin_task.abort();
                    return std::process::ExitCode::FAILURE;
                }
                Outcome::Retry => match stdio::connect(&config.socket_url).await {
                    Ok(new_peer) => {
                        current_peer = new_peer.clone();
                        let _ = peer_tx.send(new_peer);
                        reconnect.reset();
                        info!(attempt = reconnect.attempt(), "reconnected to hub");
                        break;
                    }
                    Err(err) => warn!(%err, attempt = reconnect.attempt(), "reconnect attempt failed"),
                },
            }
        }
    }
}

async fn watch_signals(shutdown: Arc<Notify>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).expect("install SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    shutdown.notify_waiters();
}
