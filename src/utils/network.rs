use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use tracing::warn;

/// Port ranges scanned, in order, when the preferred port is taken.
const FALLBACK_RANGES: [(u16, u16); 2] = [(8000, 8999), (9000, 9999)];

/// Check if `port` can be bound on `host`. Port 0 never counts as available.
pub fn is_port_available(host: IpAddr, port: u16) -> bool {
    port != 0 && TcpListener::bind(SocketAddr::new(host, port)).is_ok()
}

/// First bindable port in `start..=end`.
pub fn find_available_port(host: IpAddr, start: u16, end: u16) -> Option<u16> {
    (start..=end).find(|&port| is_port_available(host, port))
}

/// The preferred port if free, otherwise the first free port in the fallback ranges.
pub fn pick_port(host: IpAddr, preferred: u16) -> u16 {
    if is_port_available(host, preferred) {
        return preferred;
    }

    warn!("Port {} is not available, searching for alternative...", preferred);

    for (start, end) in FALLBACK_RANGES {
        if let Some(port) = find_available_port(host, start, end) {
            warn!("Using alternative port: {}", port);
            return port;
        }
    }

    // Binding will fail later with a proper error
    warn!("No available ports found, keeping preferred port {}", preferred);
    preferred
}

/// Parses a configured host, falling back to loopback on garbage.
pub fn parse_host(host: &str) -> IpAddr {
    match host {
        "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        other => other.parse().unwrap_or_else(|_| {
            warn!("Invalid host {:?}, using 127.0.0.1", other);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }),
    }
}

/// URL a browser on this machine should open.
pub fn ui_url(host: IpAddr, port: u16) -> String {
    if host.is_unspecified() || host.is_loopback() {
        format!("http://localhost:{}", port)
    } else {
        format!("http://{}", SocketAddr::new(host, port))
    }
}
