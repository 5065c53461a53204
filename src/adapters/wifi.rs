//! WiFi station adapter.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`connect`] brings up the station with
//!   `esp_idf_svc::wifi::BlockingWifi` and waits for an IP.  Whether to try
//!   at all is decided by [`plan_station`].
//! - **all other targets**: the host uses its own network stack; only the
//!   credential checks are compiled.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
        }
    }
}

impl std::error::Error for WifiError {}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Check station credentials before handing them to the driver.
pub fn validate_credentials(ssid: &str, password: &str) -> Result<(), WifiError> {
    if ssid.is_empty() {
        return Err(WifiError::NoCredentials);
    }
    if ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(WifiError::InvalidSsid);
    }
    if !password.is_empty() && (password.len() < 8 || password.len() > 64) {
        return Err(WifiError::InvalidPassword);
    }
    Ok(())
}

/// What to do with the radio at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationPlan {
    /// Credentials are usable; join the network.
    Join,
    /// No SSID configured; stay offline and let the link report unreachable.
    Offline,
}

/// Decide whether to join a network.  A missing SSID degrades to
/// [`StationPlan::Offline`]; malformed credentials are still an error.
pub fn plan_station(ssid: &str, password: &str) -> Result<StationPlan, WifiError> {
    match validate_credentials(ssid, password) {
        Ok(()) => Ok(StationPlan::Join),
        Err(WifiError::NoCredentials) => Ok(StationPlan::Offline),
        Err(e) => Err(e),
    }
}

/// Connect as a station and block until the interface is up.
#[cfg(target_os = "espidf")]
pub fn connect(
    modem: esp_idf_hal::modem::Modem,
    sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
    nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
    ssid: &str,
    password: &str,
) -> anyhow::Result<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>> {
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    validate_credentials(ssid, password)?;

    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), nvs)?, sysloop)?;
    let auth_method = if password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|_| WifiError::InvalidSsid)?,
        password: password.try_into().map_err(|_| WifiError::InvalidPassword)?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("WiFi: connecting to '{}'", ssid);
    wifi.connect()?;
    wifi.wait_netif_up()?;

    let ip = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi: connected, ip={}", ip.ip);
    Ok(wifi)
}
