use serde::Serializer;
use serde_derive::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::ParseError;
use crate::uci;

/// Ethernet hardware address, rendered as lowercase colon separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    pub fn bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    /// Accepts six hex pairs separated by `:` or `-`, or three groups of four
    /// hex digits separated by `.`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMac {
            value: s.to_string(),
        };
        let (separator, group_len) = if s.contains('.') {
            ('.', 4)
        } else if s.contains('-') {
            ('-', 2)
        } else {
            (':', 2)
        };
        let groups: Vec<&str> = s.split(separator).collect();
        if groups.len() * group_len != 12 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 6];
        let mut i = 0;
        for group in groups {
            if group.len() != group_len || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            for pair in 0..group_len / 2 {
                bytes[i] = u8::from_str_radix(&group[pair * 2..pair * 2 + 2], 16)
                    .map_err(|_| invalid())?;
                i += 1;
            }
        }
        Ok(MacAddress(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl serde::Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed hardware address to IP assignment from a `config host` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticLease {
    pub hw_addr: MacAddress,
    pub ip: IpAddr,
    pub hostname: String,
}

fn parse_addresses(mac: &str, ip: &str) -> Result<(MacAddress, IpAddr), ParseError> {
    let hw_addr = mac.parse::<MacAddress>()?;
    let ip = ip.parse::<IpAddr>().map_err(|_| ParseError::InvalidIp {
        value: ip.to_string(),
    })?;
    Ok((hw_addr, ip))
}

/// Static leases of every complete `config host` block in `text`, in file order.
///
/// A block declaring both `mac` and `ip` fails the whole read if either is
/// malformed. Blocks lacking `mac`, `ip` or `name` are otherwise skipped.
pub fn read_static_leases(text: &str, logger: &slog::Logger) -> Result<Vec<StaticLease>, ParseError> {
    let mut leases = Vec::new();
    for section in uci::sections(text)
        .iter()
        .filter(|section| section.section_type == "host")
    {
        let (hw_addr, ip) = match (section.get("mac"), section.get("ip")) {
            (Some(mac), Some(ip)) => parse_addresses(mac, ip)?,
            _ => {
                debug!(logger, "Skipping host block without mac and ip"; "name" => section.name);
                continue;
            }
        };
        match section.get("name") {
            Some(hostname) => leases.push(StaticLease {
                hw_addr,
                ip,
                hostname: hostname.to_string(),
            }),
            None => {
                debug!(logger, "Skipping host block without name"; "name" => section.name);
            }
        }
    }
    Ok(leases)
}

#[cfg(test)]
mod tests {
    use super::{read_static_leases, MacAddress};
    use crate::error::ParseError;
    use crate::logging::discard_logger;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn mac_address_forms() {
        let mac: MacAddress = "12:34:12:34:12:34".parse().unwrap();
        assert_eq!(mac.bytes(), &[0x12u8, 0x34, 0x12, 0x34, 0x12, 0x34]);
        assert_eq!(mac.to_string(), "12:34:12:34:12:34");

        let mac: MacAddress = "AA-bb-CC-00-11-ff".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:00:11:ff");

        let mac: MacAddress = "1234.abCD.00ff".parse().unwrap();
        assert_eq!(mac.to_string(), "12:34:ab:cd:00:ff");

        for bad in &[
            "",
            "12:34:12:34:12",
            "12:34:12:34:12:34:56",
            "12:34:12:34:12:3g",
            "12:34:12:34:12:+3",
            "123:4:12:34:12:34",
            "12-34:12:34:12:34",
            "1234.1234",
            "1234.1234.123",
            "1234.1234.1234.1234",
            "12:34.1234.1234",
            "é234.1234.1234",
        ] {
            assert_eq!(
                bad.parse::<MacAddress>(),
                Err(ParseError::InvalidMac {
                    value: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn reads_complete_blocks_in_order() {
        let text = "config host '1'\n\
                    option mac '12:34:12:34:12:34'\n\
                    option ip '192.168.8.2'\n\
                    option name 'first'\n\
                    config host '2'\n\
                    option mac '12:34:12:34:12:35'\n\
                    option name 'incomplete'\n\
                    config dhcp 'lan'\n\
                    option ip '192.168.8.9'\n\
                    config host '3'\n\
                    option name 'second'\n\
                    option ip 'fd00::3'\n\
                    option mac '12:34:12:34:12:36'\n";
        let leases = read_static_leases(text, &discard_logger()).unwrap();
        assert_eq!(leases.len(), 2);
        assert_eq!(leases[0].hostname, "first");
        assert_eq!(leases[0].ip, IpAddr::V4(Ipv4Addr::new(192, 168, 8, 2)));
        assert_eq!(leases[1].hostname, "second");
        assert_eq!(leases[1].ip.to_string(), "fd00::3");
        assert_eq!(leases[1].hw_addr.to_string(), "12:34:12:34:12:36");
    }

    #[test]
    fn malformed_addresses_fail() {
        let bad_mac = "config host 'x'\n\
                       option mac 'not-a-mac'\n\
                       option ip '192.168.8.2'\n\
                       option name 'x'\n";
        assert!(matches!(
            read_static_leases(bad_mac, &discard_logger()),
            Err(ParseError::InvalidMac { .. })
        ));

        let bad_ip = "config host 'x'\n\
                      option mac '12:34:12:34:12:34'\n\
                      option ip '192.168.8.256'\n\
                      option name 'x'\n";
        assert_eq!(
            read_static_leases(bad_ip, &discard_logger()),
            Err(ParseError::InvalidIp {
                value: "192.168.8.256".to_string()
            })
        );
    }

    #[test]
    fn addresses_checked_without_name() {
        let bad = "config host 'x'\n\
                   option mac 'zz:zz'\n\
                   option ip 'not-an-ip'\n";
        assert!(matches!(
            read_static_leases(bad, &discard_logger()),
            Err(ParseError::InvalidMac { .. })
        ));

        let bad_ip = "config host 'x'\n\
                      option mac '12:34:12:34:12:34'\n\
                      option ip 'not-an-ip'\n";
        assert!(matches!(
            read_static_leases(bad_ip, &discard_logger()),
            Err(ParseError::InvalidIp { .. })
        ));

        // Well formed but nameless blocks are still skipped
        let nameless = "config host 'x'\n\
                        option mac '12:34:12:34:12:34'\n\
                        option ip '192.168.8.2'\n\
                        config host 'y'\n\
                        option ip 'not-an-ip'\n";
        assert_eq!(read_static_leases(nameless, &discard_logger()), Ok(vec![]));
    }
}
