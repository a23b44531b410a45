//! mdv verifier service binary.
//!
//! Loads the trusted-root store and the circuit registry, then serves the
//! API until SIGINT or SIGTERM. Startup is fail-fast: a missing PEM bundle,
//! an empty root store, or an empty circuit registry refuses to start rather
//! than serving requests that can only be rejected.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use mdv_api::{app, AppState};
use mdv_engine::{CircuitRegistry, MockEngine, VerifierEngine};
use mdv_mdoc::TrustedRoots;
use tracing_subscriber::EnvFilter;

/// Bound on how long in-flight requests may run after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "mdv-server", about = "ZK credential verification service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8888")]
    listen: SocketAddr,

    /// PEM bundle of trusted IACA root certificates.
    #[arg(long, default_value = "certs.pem")]
    cacerts: PathBuf,

    /// Directory of circuit files, each named by its content identifier.
    #[arg(long, default_value = "circuits")]
    circuit_dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let pem = std::fs::read(&args.cacerts)
        .with_context(|| format!("reading trusted roots from {}", args.cacerts.display()))?;
    let roots = TrustedRoots::from_pem(&pem)
        .with_context(|| format!("parsing trusted roots from {}", args.cacerts.display()))?;
    tracing::info!(roots = roots.len(), "loaded trusted root store");

    let engine: Arc<dyn VerifierEngine> = Arc::new(MockEngine::new());

    let circuits = CircuitRegistry::load(&args.circuit_dir, engine.as_ref())
        .context("loading circuit registry")?;
    anyhow::ensure!(
        !circuits.is_empty(),
        "no verifiable circuits in {}",
        args.circuit_dir.display()
    );
    tracing::info!(
        circuits = circuits.len(),
        ids = ?circuits.ids().collect::<Vec<_>>(),
        "loaded circuit registry"
    );

    let state = AppState::new(engine, Arc::new(circuits), Arc::new(roots));

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    tracing::info!(listen = %args.listen, "serving");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(
        axum::serve(listener, app(state))
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .into_future(),
    );

    shutdown_signal().await;
    tracing::info!("shutdown signal received, draining connections");
    let _ = stop_tx.send(());

    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(joined) => {
            joined.context("server task panicked")?.context("serve failed")?;
            tracing::info!("server stopped");
            Ok(())
        }
        Err(_) => anyhow::bail!("shutdown grace period of {SHUTDOWN_GRACE:?} expired"),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::error!(error = %e, "cannot install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
