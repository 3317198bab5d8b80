//! GarageDoor Firmware: Main Entry Point
//!
//! Hexagonal architecture with an interrupt-fed event queue.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink     HttpRemoteStore       │
//! │  (Actuator+Display)     (EventSink)      (RemoteStorePort)     │
//! │  RandomTokenSource      WifiAdapter      Esp32TimeAdapter      │
//! │  (TokenSource)          (Connectivity)   (uptime)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              DoorService (pure logic)                  │    │
//! │  │  Door FSM · Dial FSM · RemoteLink · Scheduler          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO ISRs ──▶ InputBridge ──▶ EVENT_QUEUE                     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use garagedoor::adapters::hardware::HardwareAdapter;
use garagedoor::adapters::log_sink::LogEventSink;
use garagedoor::adapters::remote_store::HttpRemoteStore;
use garagedoor::adapters::time::Esp32TimeAdapter;
use garagedoor::adapters::token::RandomTokenSource;
use garagedoor::adapters::wifi::{ConnectivityPort, WifiAdapter};
use garagedoor::app::service::{DoorService, Step};
use garagedoor::config::SystemConfig;
use garagedoor::drivers::lcd::LcdDriver;
use garagedoor::drivers::servo::ServoDriver;
use garagedoor::drivers::watchdog::Watchdog;
use garagedoor::drivers::hw_init;
use garagedoor::error::Error;
use garagedoor::interrupts::{EVENT_QUEUE, INPUTS, SHARED_STATE};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GarageDoor v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(Error::Config)?;

    // ── 3. Hardware peripherals ───────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;
    let watchdog = Watchdog::default();
    let time = Esp32TimeAdapter::new();

    let mut hw = HardwareAdapter::new(ServoDriver::new(), LcdDriver::new());

    // ── 4. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?);

    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect(time.uptime_ms()) {
                warn!("WiFi: initial connect failed ({}), will retry", e);
            }
        }
        Err(e) => warn!("WiFi: {}; running offline", e),
    }

    let mut remote = HttpRemoteStore::new(&config.remote_base_url)
        .map_err(Error::from)
        .context("remote store URL")?;
    let mut tokens = RandomTokenSource::new();
    let mut log_sink = LogEventSink::new();

    // ── 5. Application service ────────────────────────────────
    INPUTS.set_rotation_debounce_ms(config.rotation_debounce_ms);
    let mut app = DoorService::new(&EVENT_QUEUE, &SHARED_STATE, config, time.uptime_ms());
    app.start(&mut remote, &mut log_sink)?;

    // Interrupts last: nothing may be queued before start() has run.
    hw_init::init_isr_service().map_err(Error::from)?;

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    loop {
        watchdog.feed();

        let now_ms = time.uptime_ms();
        match app.step(now_ms, &mut hw, &mut remote, &mut tokens, &mut log_sink) {
            Ok(Step::Dispatched(_)) => {}
            Ok(Step::Idle { .. }) => {
                wifi.poll(now_ms);
                // Yield so the idle task can run and the watchdog stays fed.
                esp_idf_svc::hal::delay::FreeRtos::delay_ms(10);
            }
            Err(e) => panic!("dispatch loop stopped on fatal error: {e}"),
        }
    }
}
