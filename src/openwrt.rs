use nom::character::complete::{char, digit1};
use nom::combinator::all_consuming;
use nom::sequence::terminated;
use std::convert::TryFrom;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::config::DhcpSettings;
use crate::error::{ParseError, ValidationError};
use crate::leases::{self, StaticLease};
use crate::logging;
use crate::resolv;
use crate::uci;

/// Interface the LAN bridge is always exposed as.
pub const LAN_INTERFACE: &str = "br-lan";

const SECONDS_PER_HOUR: u64 = 3600;

/// Accumulates raw values from OpenWRT UCI files and `resolv.conf`, then
/// derives the DHCP/DNS server settings from them.
///
/// The raw fields hold whatever text the files contained. The output fields
/// are only meaningful after a successful `prepare_output`.
pub struct OpenwrtConfig {
    // Raw values
    pub ipaddr: String,
    pub netmask: String,
    pub dhcp_start: String,
    pub dhcp_limit: String,
    pub dhcp_leasetime: String,
    pub dhcp_dnsmasq_lease_file: String,
    pub nameservers: Vec<String>,
    pub leases: Vec<StaticLease>,

    // Output
    pub iface: String,
    pub gw_ip: String,
    pub sn_mask: String,
    pub range_start: String,
    pub range_end: String,
    // Seconds
    pub lease_dur: u32,
    pub bs_dns: Vec<String>,

    logger: slog::Logger,
}

impl Default for OpenwrtConfig {
    fn default() -> Self {
        OpenwrtConfig::new(logging::discard_logger())
    }
}

fn decimal(input: &str) -> Option<u64> {
    all_consuming(digit1::<&str, nom::error::Error<&str>>)(input)
        .ok()
        .and_then(|(_, digits)| digits.parse::<u64>().ok())
}

fn octet(input: &str) -> Option<u8> {
    decimal(input).and_then(|value| u8::try_from(value).ok())
}

/// Hours of an `<integer>h` lease time.
fn lease_hours(input: &str) -> Option<&str> {
    all_consuming(terminated(digit1::<&str, nom::error::Error<&str>>, char('h')))(input)
        .ok()
        .map(|(_, hours)| hours)
}

impl OpenwrtConfig {
    pub fn new(logger: slog::Logger) -> OpenwrtConfig {
        OpenwrtConfig {
            ipaddr: String::new(),
            netmask: String::new(),
            dhcp_start: String::new(),
            dhcp_limit: String::new(),
            dhcp_leasetime: String::new(),
            dhcp_dnsmasq_lease_file: String::new(),
            nameservers: Vec::new(),
            leases: Vec::new(),
            iface: String::new(),
            gw_ip: String::new(),
            sn_mask: String::new(),
            range_start: String::new(),
            range_end: String::new(),
            lease_dur: 0,
            bs_dns: Vec::new(),
            logger: logger.new(o!("module" => "openwrt")),
        }
    }

    /// Store the recognized options of every `section_type` section named
    /// `name` (any name if empty). Later sections override earlier ones.
    pub fn read_conf(&mut self, data: &[u8], section_type: &str, name: &str) {
        let text = String::from_utf8_lossy(data);
        for section in uci::sections(&text).iter() {
            if !section.matches(section_type, name) {
                debug!(self.logger, "Skipping section";
                    "type" => section.section_type, "name" => section.name);
                continue;
            }
            for (key, value) in section.options.iter() {
                self.store(section.section_type, key, value);
            }
        }
    }

    fn store(&mut self, section_type: &str, key: &str, value: &str) {
        let field = match (section_type, key) {
            ("interface", "netmask") => &mut self.netmask,
            ("interface", "ipaddr") => &mut self.ipaddr,
            ("dhcp", "start") => &mut self.dhcp_start,
            ("dhcp", "limit") => &mut self.dhcp_limit,
            ("dhcp", "leasetime") => &mut self.dhcp_leasetime,
            ("dnsmasq", "leasefile") => &mut self.dhcp_dnsmasq_lease_file,
            _ => return,
        };
        *field = value.to_string();
    }

    /// Append the static leases of all complete `config host` blocks.
    ///
    /// Nothing is appended if any complete block holds a malformed address.
    pub fn read_conf_dhcp_static(&mut self, data: &[u8]) -> Result<(), ParseError> {
        let text = String::from_utf8_lossy(data);
        let leases = leases::read_static_leases(&text, &self.logger)?;
        debug!(self.logger, "Read static leases"; "count" => leases.len());
        self.leases.extend(leases);
        Ok(())
    }

    /// Append every `nameserver` address of a `resolv.conf` file.
    pub fn read_resolv_conf(&mut self, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        self.nameservers
            .extend(resolv::nameservers(&text).into_iter().map(String::from));
    }

    /// Validate the raw values and derive the output fields.
    ///
    /// On error the output fields may be partially updated and must not be used.
    pub fn prepare_output(&mut self) -> Result<(), ValidationError> {
        self.finalize().map(|_| ())
    }

    fn finalize(&mut self) -> Result<(Ipv4Addr, Ipv4Addr, Ipv4Addr), ValidationError> {
        self.iface = LAN_INTERFACE.to_string();
        self.gw_ip = self.ipaddr.clone();
        self.sn_mask = self.netmask.clone();

        let gateway = match self.ipaddr.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => addr,
            Ok(IpAddr::V6(_)) => {
                return Err(ValidationError::GatewayNotIpv4 {
                    value: self.ipaddr.clone(),
                })
            }
            Err(_) => {
                return Err(ValidationError::InvalidGateway {
                    value: self.ipaddr.clone(),
                })
            }
        };

        let start = octet(&self.dhcp_start).ok_or_else(|| ValidationError::InvalidRangeStart {
            value: self.dhcp_start.clone(),
        })?;
        let limit = octet(&self.dhcp_limit).ok_or_else(|| ValidationError::InvalidRangeLimit {
            value: self.dhcp_limit.clone(),
        })?;
        // Range is start..=start+limit-1 within the gateway's /24
        let last = u16::from(start) + u16::from(limit);
        if limit == 0 || last - 1 > u16::from(u8::MAX) {
            return Err(ValidationError::RangeOverflow { start, limit });
        }
        let prefix = gateway.octets();
        let range_start = Ipv4Addr::new(prefix[0], prefix[1], prefix[2], start);
        let range_end = Ipv4Addr::new(prefix[0], prefix[1], prefix[2], (last - 1) as u8);
        self.range_start = range_start.to_string();
        self.range_end = range_end.to_string();

        let hours = lease_hours(&self.dhcp_leasetime).ok_or_else(|| {
            ValidationError::InvalidLeaseTime {
                value: self.dhcp_leasetime.clone(),
            }
        })?;
        self.lease_dur = hours
            .parse::<u64>()
            .ok()
            .and_then(|hours| hours.checked_mul(SECONDS_PER_HOUR))
            .and_then(|secs| u32::try_from(secs).ok())
            .ok_or_else(|| ValidationError::LeaseTimeOverflow {
                value: self.dhcp_leasetime.clone(),
            })?;

        self.bs_dns = self.nameservers.clone();

        info!(self.logger, "Prepared DHCP configuration";
            "iface" => &self.iface,
            "gateway" => &self.gw_ip,
            "range_start" => &self.range_start,
            "range_end" => &self.range_end,
            "lease_secs" => self.lease_dur,
            "nameservers" => self.bs_dns.len(),
            "static_leases" => self.leases.len());
        Ok((gateway, range_start, range_end))
    }

    /// Run `prepare_output` and convert its result into typed server settings.
    pub fn settings(&mut self) -> Result<DhcpSettings, ValidationError> {
        let (gateway, range_start, range_end) = self.finalize()?;
        let subnet_mask =
            self.sn_mask
                .parse::<Ipv4Addr>()
                .map_err(|_| ValidationError::InvalidNetmask {
                    value: self.sn_mask.clone(),
                })?;

        let logger = &self.logger;
        let domain_servers = self
            .bs_dns
            .iter()
            .filter_map(|server| match server.parse::<IpAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!(logger, "Dropping nameserver that is not an IP address"; "nameserver" => server);
                    None
                }
            })
            .collect();

        Ok(DhcpSettings {
            interface: self.iface.clone(),
            gateway,
            subnet_mask,
            range_start,
            range_end,
            lease_duration: Duration::from_secs(u64::from(self.lease_dur)),
            domain_servers,
            static_leases: self.leases.clone(),
            lease_file: self.dhcp_dnsmasq_lease_file.clone(),
        })
    }
}
