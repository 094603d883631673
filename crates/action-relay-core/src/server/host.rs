use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

/// Public address used only to pick the outbound interface. Connecting a UDP
/// socket sends no packets.
const ROUTE_TARGET: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 80);

/// First non-loopback IPv4 address of this host, as the remote would dial it.
///
/// `None` when the host has no IPv4 route.
pub fn host_ipv4() -> Option<Ipv4Addr> {
    let local_ip = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect(ROUTE_TARGET)?;
        Ok(socket.local_addr()?.ip())
    };

    match local_ip() {
        Ok(IpAddr::V4(ip)) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        Ok(ip) => {
            debug!(%ip, "Outbound interface has no usable IPv4 address");
            None
        }
        Err(e) => {
            debug!(error = %e, "Could not determine host IPv4 address");
            None
        }
    }
}
