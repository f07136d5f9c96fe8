use thiserror::Error;

/// Raised while reading `config host` blocks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid MAC address: {value}")]
    InvalidMac { value: String },

    #[error("Invalid IP address: {value}")]
    InvalidIp { value: String },
}

/// Raised by the finalization pass over accumulated values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid gateway address: {value}")]
    InvalidGateway { value: String },

    #[error("Gateway address is not IPv4: {value}")]
    GatewayNotIpv4 { value: String },

    #[error("Invalid DHCP range start: {value}")]
    InvalidRangeStart { value: String },

    #[error("Invalid DHCP range limit: {value}")]
    InvalidRangeLimit { value: String },

    #[error("DHCP range does not fit in one octet: start {start}, limit {limit}")]
    RangeOverflow { start: u8, limit: u8 },

    #[error("Invalid lease time, expected <hours>h: {value}")]
    InvalidLeaseTime { value: String },

    #[error("Lease time too long: {value}")]
    LeaseTimeOverflow { value: String },

    #[error("Invalid subnet mask: {value}")]
    InvalidNetmask { value: String },
}
