//! SpecKey bridge entry point.
//!
//! Translates local keyboard activity into the device's ASCII key-event
//! protocol and delivers it over UDP or a serial link. Wires together the
//! infrastructure services and starts the Tokio async runtime.
//!
//! # Usage
//!
//! ```text
//! speckey-server [--config <FILE>] <COMMAND>
//!
//! Commands:
//!   listen   Capture local keystrokes and forward them live
//!   type     Press the keys of a text on the device
//!
//! Examples:
//!   speckey-server listen
//!   speckey-server listen --transport serial
//!   speckey-server type --text '10 PRINT "HELLO"'
//!   speckey-server type --file listing.bas --transport udp
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()              -- TOML file or built-in defaults
//!  └─ listen:
//!       ├─ WindowsKeyCaptureService (Windows hook thread)
//!       ├─ UdpTransport / SerialTransport
//!       └─ ForwardKeysUseCase       (drains events until Esc)
//!  └─ type:
//!       ├─ SerialTransport / UdpTransport
//!       └─ TypeTextUseCase          (plays the planned strokes)
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use speckey_server::application::{ForwardKeysUseCase, TypeTextUseCase};
use speckey_server::infrastructure::config::{load_config, AppConfig};
use speckey_server::infrastructure::hook::{CaptureError, KeySource};
use speckey_server::infrastructure::transport::{
    choose_port, SerialTransport, Transport, UdpTransport,
};

#[cfg(target_os = "windows")]
use speckey_server::infrastructure::hook::WindowsKeyCaptureService;

/// Polling interval for the serial echo pump.
const ECHO_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keyboard bridge for the SpecKey device.
///
/// The `#[derive(Parser)]` macro from `clap` generates the argument parser
/// automatically from the struct fields and their `#[arg(...)]` attributes.
#[derive(Debug, Parser)]
#[command(
    name = "speckey-server",
    about = "Bridges local keyboard input to a SpecKey device over UDP or serial",
    version
)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// When absent, built-in defaults matching the stock device firmware
    /// are used. A named file must exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Captures local keystrokes and forwards them to the device live.
    ///
    /// Every mapped press and release becomes one message. Pressing Esc
    /// sends the reserved cancel message and ends the session.
    Listen {
        /// Channel to deliver messages over.
        #[arg(long, value_enum, default_value = "udp")]
        transport: TransportKind,

        /// Device hostname for UDP; overrides the config file.
        #[arg(long)]
        host: Option<String>,

        /// Device UDP port; overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Presses the keys of a text on the device, in order.
    ///
    /// Characters the device keyboard cannot produce are reported with
    /// their position and skipped.
    Type {
        /// Text to type.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read the text to type from a file instead.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Channel to deliver messages over.
        #[arg(long, value_enum, default_value = "serial")]
        transport: TransportKind,

        /// Device hostname for UDP; overrides the config file.
        #[arg(long)]
        host: Option<String>,

        /// Device UDP port; overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Which channel carries the key messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransportKind {
    /// One datagram per message, no return traffic.
    Udp,
    /// Newline-terminated messages with echoed lines read back.
    Serial,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Listen {
            transport,
            host,
            port,
        } => run_listen(&config, transport, host, port).await,
        Command::Type {
            text,
            file,
            transport,
            host,
            port,
        } => {
            let text = resolve_text(text, file)?;
            run_type(&config, transport, host, port, &text).await
        }
    }
}

/// Produces the text to type from whichever of `--text`/`--file` was given.
fn resolve_text(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (text, file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read text from {}", path.display())),
        // clap enforces exactly one of the two
        _ => anyhow::bail!("exactly one of --text or --file must be given"),
    }
}

// ── Listen command ────────────────────────────────────────────────────────────

async fn run_listen(
    config: &AppConfig,
    kind: TransportKind,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let source = make_key_source()?;
    let transport = open_transport(kind, host, port, config).await?;

    let running = Arc::new(AtomicBool::new(true));

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    let source_clone = Arc::clone(&source);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
                // Closes the event channel, which ends the forwarding loop.
                source_clone.stop();
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    if matches!(kind, TransportKind::Serial) {
        spawn_echo_pump(Arc::clone(&transport), Arc::clone(&running));
    }

    let events = source.start()?;
    info!("forwarding keystrokes; press Esc or Ctrl+C to finish");

    let summary = ForwardKeysUseCase::new(Arc::clone(&transport))
        .run(events)
        .await;

    running.store(false, Ordering::Relaxed);
    source.stop();
    transport.close();

    if summary.cancelled {
        info!("session ended from the keyboard");
    }
    info!(
        "forwarded {} message(s), skipped {} unmapped key(s)",
        summary.sent, summary.unmapped
    );
    Ok(())
}

#[cfg(target_os = "windows")]
fn make_key_source() -> Result<Arc<dyn KeySource>, CaptureError> {
    Ok(Arc::new(WindowsKeyCaptureService::new()))
}

#[cfg(not(target_os = "windows"))]
fn make_key_source() -> Result<Arc<dyn KeySource>, CaptureError> {
    Err(CaptureError::UnsupportedPlatform(
        "live key capture needs the Windows keyboard hook; use the type command on this host"
            .to_string(),
    ))
}

// ── Type command ──────────────────────────────────────────────────────────────

async fn run_type(
    config: &AppConfig,
    kind: TransportKind,
    host: Option<String>,
    port: Option<u16>,
    text: &str,
) -> anyhow::Result<()> {
    let transport = open_transport(kind, host, port, config).await?;

    let running = Arc::new(AtomicBool::new(true));

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    if matches!(kind, TransportKind::Serial) {
        spawn_echo_pump(Arc::clone(&transport), Arc::clone(&running));

        // Boards that reset when the port opens need a moment before the
        // first stroke can land.
        info!(
            "waiting {:?} for the device to settle",
            config.typing.settle()
        );
        sleep(config.typing.settle()).await;
    }

    let use_case = TypeTextUseCase::new(
        Arc::clone(&transport),
        config.typing.key_delay(),
        config.typing.press_duration(),
        Arc::clone(&running),
    );
    let report = use_case.run(text).await;

    running.store(false, Ordering::Relaxed);
    transport.close();

    if report.cancelled {
        info!("typing interrupted before completion");
    }
    info!(
        "typed {} message(s), skipped {} character(s)",
        report.sent, report.unmapped
    );
    Ok(())
}

// ── Shared plumbing ───────────────────────────────────────────────────────────

/// Opens the requested channel, falling back to config values for anything
/// not overridden on the command line.
async fn open_transport(
    kind: TransportKind,
    host: Option<String>,
    port: Option<u16>,
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn Transport>> {
    match kind {
        TransportKind::Udp => {
            let host = host.unwrap_or_else(|| config.device.hostname.clone());
            let port = port.unwrap_or(config.device.udp_port);
            let transport = UdpTransport::open(&host, port)
                .await
                .with_context(|| format!("cannot reach device at {host}:{port}"))?;
            info!("connected to {host}:{port}");
            Ok(Arc::new(transport))
        }
        TransportKind::Serial => {
            // The prompt blocks on stdin, so it runs off the async runtime.
            let port_name = tokio::task::spawn_blocking(choose_port)
                .await
                .context("port selection task failed")??;
            let transport = SerialTransport::open(
                &port_name,
                config.serial.baud,
                config.serial.read_timeout(),
            )?;
            info!("connected to {port_name}");
            Ok(Arc::new(transport))
        }
    }
}

/// Spawns a task that logs every line the device echoes back.
fn spawn_echo_pump(transport: Arc<dyn Transport>, running: Arc<AtomicBool>) {
    tokio::spawn(async move {
        while running.load(Ordering::Relaxed) {
            while let Some(line) = transport.try_receive_line() {
                info!("received: {line}");
            }
            sleep(ECHO_POLL_INTERVAL).await;
        }
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────
