use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Host aggregation from `host/{ip-or-domain}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    /// The looked-up host (IP or domain)
    #[serde(default)]
    pub host: String,

    /// Resolved IP address as a string
    #[serde(default)]
    pub ip: String,

    /// Autonomous System Number
    #[serde(default)]
    pub asn: Option<u64>,

    /// Organization owning the address space
    #[serde(default)]
    pub org: Option<String>,

    /// Full country name
    #[serde(default)]
    pub country_name: Option<String>,

    /// Two-letter country code
    #[serde(default)]
    pub country_code: Option<String>,

    /// Detected protocols
    #[serde(default)]
    pub protocol: Vec<String>,

    /// Open ports
    #[serde(default)]
    pub port: Vec<u16>,

    /// Asset categories
    #[serde(default)]
    pub category: Vec<String>,

    /// Detected products
    #[serde(default)]
    pub product: Vec<String>,

    /// Last time the host data changed
    #[serde(default)]
    pub update_time: Option<String>,
}

impl HostInfo {
    /// Returns the IP address if it parses
    #[must_use]
    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.ip.parse().ok()
    }

    /// Returns true if the port was seen open
    #[must_use]
    pub fn has_port(&self, port: u16) -> bool {
        self.port.contains(&port)
    }
}
