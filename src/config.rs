use dhcp4r::options::DhcpOption;
use serde_derive::Serialize;
use std::convert::TryFrom;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::leases::StaticLease;

/// Validated settings handed to the DHCP/DNS server.
///
/// Dynamic leases are served from `range_start` through `range_end` inclusive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DhcpSettings {
    pub interface: String,
    pub gateway: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub range_start: Ipv4Addr,
    pub range_end: Ipv4Addr,
    #[serde(with = "serde_millis")]
    pub lease_duration: Duration,
    pub domain_servers: Vec<IpAddr>,
    pub static_leases: Vec<StaticLease>,
    pub lease_file: String,
}

impl DhcpSettings {
    /// Number of addresses in the dynamic range, zero if the range is inverted.
    pub fn lease_count(&self) -> u32 {
        u32::from(self.range_end)
            .checked_sub(u32::from(self.range_start))
            .map_or(0, |span| span.saturating_add(1))
    }

    /// Options attached to every OFFER and ACK.
    ///
    /// Only IPv4 nameservers can be carried in the domain server option.
    /// Lease times beyond the option's range are capped at `u32::MAX` seconds.
    pub fn options(&self) -> Vec<DhcpOption> {
        let domain_servers = self
            .domain_servers
            .iter()
            .filter_map(|addr| match addr {
                IpAddr::V4(v4) => Some(*v4),
                IpAddr::V6(_) => None,
            })
            .collect();
        vec![
            DhcpOption::IpAddressLeaseTime(
                u32::try_from(self.lease_duration.as_secs()).unwrap_or(u32::MAX),
            ),
            DhcpOption::SubnetMask(self.subnet_mask),
            DhcpOption::Router(vec![self.gateway]),
            DhcpOption::DomainNameServer(domain_servers),
        ]
    }
}
