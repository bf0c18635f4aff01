//! TwinLink agent: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  GpioBank<SimPin>   StdioTransport   StaticNetwork           │
//! │  (HardwarePort)     (TransportPort)  (NetworkInfoPort)       │
//! │  SharedPeriod / SensorTimer (PeriodicTimer)                  │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            AgentService (pure logic)                   │  │
//! │  │  registry · reconciler · dispatcher · monitors         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `twinlink [config.json]`.  Log level via `RUST_LOG`.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use twinlink::Error;
use twinlink::adapters::hardware::simulated_bank;
use twinlink::adapters::stdio_transport::StdioTransport;
use twinlink::adapters::time::{SensorTimer, SharedPeriod};
use twinlink::adapters::wifi::StaticNetwork;
use twinlink::app::service::AgentService;
use twinlink::board;
use twinlink::config::{AgentConfig, ConfigError};
use twinlink::rpc::standard_dispatcher;
use twinlink::termination::{FatalReason, TerminationFlag};

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => AgentConfig::default(),
    };
    info!(
        "twinlink {} starting, dialect {:?}, sensor poll {}s",
        config.version_string, config.dialect, config.sensor_poll_secs
    );

    // ── 3. Termination ────────────────────────────────────────
    let termination = TerminationFlag::new();
    for signal in [SIGTERM, SIGINT] {
        signal_hook::flag::register(signal, termination.as_signal_flag())
            .context("registering signal handler")?;
    }

    // ── 4. Core + adapters ────────────────────────────────────
    let period = SharedPeriod::new(config.sensor_poll_secs);
    let mut sensor_timer = SensorTimer::new(period.clone());

    let registry = board::build_registry().map_err(Error::from)?;
    let dispatcher = standard_dispatcher(&termination, period.clone()).map_err(Error::from)?;
    let mut service = AgentService::new(&config, registry, dispatcher, termination.clone());

    let inputs: Vec<_> = board::BUTTONS.iter().map(|&(_, line)| line).collect();
    let mut gpio = simulated_bank(&board::OUTPUT_LINES, &inputs);
    let mut network = StaticNetwork::simulated();
    let mut transport = StdioTransport::spawn().context("starting console transport")?;

    service.start(&mut gpio).context("initialising outputs")?;

    // ── 5. Main loop ──────────────────────────────────────────
    let tick = Duration::from_millis(u64::from(config.button_poll_ms));
    while !service.should_terminate() {
        service.run_once(&mut gpio, &mut network, &mut transport);

        if sensor_timer.expired(Instant::now()) {
            debug!("sensor poll ({}s period)", period.seconds());
        }
        if transport.is_closed() {
            termination.request(FatalReason::Signal);
        }
        std::thread::sleep(tick);
    }

    // ── 6. Teardown ───────────────────────────────────────────
    service.shutdown(&mut gpio);

    match termination.reason() {
        Some(reason @ (FatalReason::HardwareWrite | FatalReason::HardwareRead | FatalReason::Allocation)) => {
            bail!("terminated: {:?}", reason)
        }
        _ => Ok(()),
    }
}

fn load_config(path: &Path) -> Result<AgentConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| Error::from(ConfigError::NotFound))
        .with_context(|| format!("reading {}", path.display()))?;
    let config = AgentConfig::from_json(&text)
        .map_err(Error::from)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}
