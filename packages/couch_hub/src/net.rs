//! Local network address discovery
//!
//! The host screen shows players where to point their phones, so the server
//! works out its LAN address once at startup. Absence is non-fatal; the
//! `host-joined` notification simply omits the hint.

use local_ip_address::local_ip;
use tracing::warn;

pub fn server_address_hint(port: u16) -> Option<String> {
    match local_ip() {
        Ok(ip) => Some(format!("{}:{}", ip, port)),
        Err(e) => {
            warn!("could not determine local network address: {}", e);
            None
        }
    }
}
