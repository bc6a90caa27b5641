use std::net::{IpAddr, Ipv4Addr};

/// Header carrying the reporting agent's identity
pub const IDENTITY_HEADER: &str = "Rr-Identity";

pub const REPORT_PATH: &str = "/";
pub const ADD_IDENTITY_PATH: &str = "/addIdentity";
pub const REQUEST_ALL_PATH: &str = "/requestAll";

const HUB_PORT: &str = "HUB_PORT";

const DEFAULT_PORT: u16 = 34567;

pub fn get_default_port() -> u16 {
    DEFAULT_PORT
}

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(HUB_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const HUB_ADDR: &str = "HUB_ADDR";

const DEFAULT_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0));

pub fn get_addr() -> IpAddr {
    let addr_from_env = std::env::var(HUB_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

const AGENT_INTERVAL: &str = "AGENT_INTERVAL";

const DEFAULT_INTERVAL: u64 = 15;

pub fn get_interval() -> u64 {
    let interval_from_env = std::env::var(AGENT_INTERVAL);
    interval_from_env.map_or(DEFAULT_INTERVAL, |res| {
        res.parse().unwrap_or(DEFAULT_INTERVAL)
    })
}
