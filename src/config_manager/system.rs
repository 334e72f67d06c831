use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(rename = "static_dir")]
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Largest accepted upload, in megabytes
    #[serde(rename = "max_upload_mb")]
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12393
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_upload_mb() -> usize {
    50
}

impl SystemConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_upload_mb == 0 {
            anyhow::bail!("max_upload_mb must be greater than zero");
        }
        Ok(())
    }

    pub fn static_path(&self) -> PathBuf {
        PathBuf::from(&self.static_dir)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    /// Address to bind; an unparseable host falls back to all interfaces
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.port)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}
