//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], which is all the control core ever
//! sees of the network.  Joining, retrying and link supervision live here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests, with
//!   knobs to drop the link and inject connect failures.
//!
//! ## Reconnection policy
//!
//! Boot-time joining blocks, bounded by `connect_attempts`.  After that, and
//! whenever the link drops, [`WifiAdapter::poll`] starts a join without
//! waiting for it and checks the link on later polls.  Joins are started on
//! an exponential backoff (2 s → 4 s → 8 s … capped at 60 s).  The trap
//! keeps running offline in the meantime.

use core::fmt;
use log::{debug, error, info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use crate::app::ports::ConnectivityPort;
use crate::config::NetworkConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_MS: u64 = 2_000;
const MAX_BACKOFF_MS: u64 = 60_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_ms: u64,
    /// Uptime at which the next background reconnect may run.
    next_retry_ms: u64,
    last_rssi: Option<i8>,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(target_os = "espidf")]
    started: bool,
    #[cfg(not(target_os = "espidf"))]
    sim: SimLink,
}

/// Host-side stand-in for the radio.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimLink {
    up: bool,
    fail_next: u32,
    connect_calls: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            next_retry_ms: 0,
            last_rssi: None,
            wifi,
            started: false,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            next_retry_ms: 0,
            last_rssi: None,
            sim: SimLink::default(),
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn rssi(&self) -> Option<i8> {
        self.last_rssi
    }

    /// Current reconnect backoff.
    pub fn backoff_ms(&self) -> u64 {
        self.backoff_ms
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    /// One join attempt.
    pub fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;

        match self.platform_connect() {
            Ok(()) => {
                self.on_connected();
                info!("WiFi: connected (RSSI={:?})", self.last_rssi);
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.state = WifiState::Reconnecting { attempt: 0 };
                Err(e)
            }
        }
    }

    /// Join using the stored network settings, trying at most
    /// `connect_attempts` times with `retry_delay_ms` between tries.
    ///
    /// On exhaustion the adapter is left in `Reconnecting` so that
    /// [`poll`](Self::poll) keeps trying in the background.
    pub fn connect_with_retry(&mut self, net: &NetworkConfig) -> Result<(), ConnectivityError> {
        self.set_credentials(&net.ssid, &net.password)?;

        let attempts = net.connect_attempts.max(1);
        for attempt in 1..=attempts {
            match self.connect() {
                Ok(()) => return Ok(()),
                Err(ConnectivityError::AlreadyConnected) => return Ok(()),
                Err(e) if attempt == attempts => {
                    warn!("WiFi: giving up after {} attempts, continuing offline", attempts);
                    return Err(e);
                }
                Err(_) => {
                    info!("WiFi: attempt {}/{} failed, retrying", attempt, attempts);
                    std::thread::sleep(std::time::Duration::from_millis(u64::from(
                        net.retry_delay_ms,
                    )));
                }
            }
        }
        Err(ConnectivityError::ConnectionFailed)
    }

    pub fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        self.last_rssi = None;
        info!("WiFi: disconnected");
    }

    /// Link supervision, called from the main loop between ticks.  Never
    /// waits on the radio.
    pub fn poll(&mut self, now_ms: u64) {
        match self.state {
            WifiState::Reconnecting { attempt } => {
                if self.platform_is_connected() {
                    self.on_connected();
                    info!("WiFi: reconnected after {} attempt(s) (RSSI={:?})", attempt, self.last_rssi);
                    return;
                }
                if now_ms < self.next_retry_ms {
                    return;
                }
                info!("WiFi: reconnect attempt {} (backoff {} ms)", attempt + 1, self.backoff_ms);
                if let Err(e) = self.platform_begin_connect() {
                    debug!("WiFi: reconnect not started: {}", e);
                }
                self.next_retry_ms = now_ms + self.backoff_ms;
                self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
                self.state = WifiState::Reconnecting { attempt: attempt + 1 };
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                    self.next_retry_ms = now_ms + self.backoff_ms;
                    self.last_rssi = None;
                } else {
                    self.last_rssi = self.platform_rssi();
                }
            }
            _ => {}
        }
    }

    fn on_connected(&mut self) {
        self.state = WifiState::Connected;
        self.backoff_ms = INITIAL_BACKOFF_MS;
        self.next_retry_ms = 0;
        self.last_rssi = self.platform_rssi();
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn ensure_started(&mut self) -> Result<(), ConnectivityError> {
        if self.started {
            return Ok(());
        }
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let cfg = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        self.wifi.set_configuration(&cfg).map_err(|e| {
            warn!("WiFi: set_configuration failed: {}", e);
            ConnectivityError::ConnectionFailed
        })?;
        self.wifi.start().map_err(|e| {
            warn!("WiFi: start failed: {}", e);
            ConnectivityError::ConnectionFailed
        })?;
        self.started = true;
        Ok(())
    }

    /// Join and wait for an IP.  Boot only.
    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        self.ensure_started()?;
        self.wifi.connect().map_err(|e| {
            warn!("WiFi: connect failed: {}", e);
            ConnectivityError::ConnectionFailed
        })?;
        self.wifi.wait_netif_up().map_err(|e| {
            warn!("WiFi: netif did not come up: {}", e);
            ConnectivityError::ConnectionFailed
        })
    }

    /// Ask the driver to join and return at once; the outcome shows up
    /// in [`platform_is_connected`](Self::platform_is_connected).
    #[cfg(target_os = "espidf")]
    fn platform_begin_connect(&mut self) -> Result<(), ConnectivityError> {
        self.ensure_started()?;
        self.wifi.wifi_mut().connect().map_err(|e| {
            warn!("WiFi: connect request failed: {}", e);
            ConnectivityError::ConnectionFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        self.platform_begin_connect()
    }

    /// The simulated link is up as soon as a join is accepted; the adapter
    /// only notices on its next check.
    #[cfg(not(target_os = "espidf"))]
    fn platform_begin_connect(&mut self) -> Result<(), ConnectivityError> {
        self.sim.connect_calls = self.sim.connect_calls.wrapping_add(1);
        if self.sim.fail_next > 0 {
            self.sim.fail_next -= 1;
            warn!("WiFi(sim): simulated failure (attempt {})", self.sim.connect_calls);
            return Err(ConnectivityError::ConnectionFailed);
        }
        self.sim.up = true;
        info!("WiFi(sim): joined '{}' (attempt {})", self.ssid, self.sim.connect_calls);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            warn!("WiFi: disconnect failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.up = false;
        info!("WiFi(sim): disconnected");
    }

    /// Associated and the netif has an address.
    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim.up
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        let mut ap_info = esp_idf_svc::sys::wifi_ap_record_t::default();
        // SAFETY: out-parameter owned by this frame; the driver is started.
        let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
        (ret == esp_idf_svc::sys::ESP_OK as i32).then_some(ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        self.sim.up.then_some(-60)
    }

    // ── Simulation knobs ──────────────────────────────────────

    /// Drop the simulated link without telling the adapter.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim.up = false;
    }

    /// Make the next `n` simulated join attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim.fail_next = n;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_connect_calls(&self) -> u32 {
        self.sim.connect_calls
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
