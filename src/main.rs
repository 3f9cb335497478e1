//! SmartTrap Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single polled control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     LogEventSink   NvsAdapter   Esp32Time     │
//! │  (Distance+Actuator) (EventSink)    (Config)     (Clock)       │
//! │  WifiAdapter         CloudReporter                             │
//! │  (Connectivity)      (StatusReporter)                          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              TrapService (pure logic)                  │    │
//! │  │  Classifier · Policy · ActuatorController              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  PeriodicScheduler (delegate-driven) · Watchdog                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use smarttrap::adapters::hardware::HardwareAdapter;
use smarttrap::adapters::log_sink::LogEventSink;
use smarttrap::adapters::nvs::NvsAdapter;
use smarttrap::adapters::reporter::{CloudReporter, LogTransport};
use smarttrap::adapters::time::Esp32TimeAdapter;
use smarttrap::adapters::wifi::WifiAdapter;
use smarttrap::app::ports::{ClockPort, ConfigPort};
use smarttrap::app::service::{ServiceTick, TrapService};
use smarttrap::config::{ConfigOverrides, SystemConfig};
use smarttrap::drivers::hw_init;
use smarttrap::drivers::watchdog::Watchdog;
use smarttrap::error::Error;
use smarttrap::scheduler::PeriodicScheduler;

fn load_config(nvs: Option<&NvsAdapter>) -> SystemConfig {
    let Some(nvs) = nvs else {
        return SystemConfig::default();
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            return SystemConfig::default();
        }
    };
    // A blob written by an older build may decode but no longer validate.
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("Stored config rejected ({}), using defaults", Error::from(e));
            SystemConfig::default()
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartTrap v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = NvsAdapter::new()
        .inspect_err(|e| warn!("NVS unavailable ({}), config will not persist", e))
        .ok();
    let config = load_config(nvs.as_ref());

    // ── 3. Initialise hardware peripherals ────────────────────
    hw_init::init_peripherals(&config.pins, &config.pwm).map_err(Error::from)?;
    let clock = Esp32TimeAdapter::new();
    let mut board = HardwareAdapter::from_config(&config, clock);
    let mut sink = LogEventSink::new();

    // ── 4. Baseline actuators before anything can block ───────
    let mut app = TrapService::new(config.clone());
    app.start(&mut board, &mut sink);

    // ── 5. Build-time provisioning over the stored config ─────
    match ConfigOverrides::from_build_env().apply(app.config()) {
        Ok(Some(provisioned)) => {
            if let Some(nvs) = &nvs {
                if let Err(e) = nvs.save(&provisioned) {
                    warn!("Provisioned config not saved: {}", e);
                }
            }
            app.update_config(provisioned).map_err(Error::from)?;
        }
        Ok(None) => {}
        Err(e) => warn!("Build-time overrides ignored: {}", Error::from(e)),
    }
    let config = app.config().clone();

    // ── 6. Network (bounded; the trap runs offline on failure) ─
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
        sysloop,
    )?;
    let mut wifi = WifiAdapter::new(driver);
    match wifi.connect_with_retry(&config.network) {
        Ok(()) => info!("Network ready"),
        Err(e) => warn!("{}; starting offline", Error::from(e)),
    }

    // ── 7. Control loop ───────────────────────────────────────
    let mut reporter = CloudReporter::new(LogTransport);
    let mut scheduler = PeriodicScheduler::new(config.timing.tick_period_ms);
    let mut watchdog = Watchdog::new();
    let poll_interval = std::time::Duration::from_millis(u64::from(config.timing.poll_interval_ms));

    info!("System ready. Entering control loop.");

    loop {
        let mut tick = ServiceTick {
            app: &mut app,
            hw: &mut board,
            net: &wifi,
            clock: &clock,
            reporter: &mut reporter,
            sink: &mut sink,
            outcome: None,
        };
        scheduler.poll(&clock, &mut tick);

        wifi.poll(clock.uptime_ms());
        watchdog.feed();
        std::thread::sleep(poll_interval);
    }
}
