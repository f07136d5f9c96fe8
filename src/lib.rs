#[macro_use]
extern crate slog;
extern crate slog_async;
extern crate slog_term;

pub mod config;
pub mod error;
pub mod leases;
pub mod logging;
pub mod openwrt;
pub mod resolv;
pub mod uci;

pub use config::DhcpSettings;
pub use error::{ParseError, ValidationError};
pub use leases::{MacAddress, StaticLease};
pub use openwrt::OpenwrtConfig;
