// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Range expansion: CIDRs into subnets or addresses, optionally crossed with port presets.

use async_trait::async_trait;
use ipnetwork::IpNetwork;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};
use crate::target::hostname;

/// Largest number of subnets a single input line may expand into
pub const MAX_EXPANSION: u128 = 1 << 24;

const SMALL: &[u16] = &[80, 443, 8000, 8080, 8081, 8443, 9000, 9200];
const MEDIUM_EXTRA: &[u16] = &[81, 3000, 6066, 6443, 8008, 8083, 8834, 8888, 9091, 9443];
const LARGE_EXTRA: &[u16] = &[591, 2082, 2087, 2095, 2096, 4444, 4040, 9092, 10250, 10251];
const XLARGE: &[u16] = &[
    80, 443, 81, 300, 591, 593, 832, 981, 1010, 1311, 2082, 2087, 2095, 2096, 2480, 3000, 3128,
    3333, 4243, 4567, 4711, 4712, 4993, 5000, 5104, 5108, 5800, 6543, 7000, 7396, 7474, 8000,
    8001, 8008, 8014, 8042, 8069, 8080, 8081, 8083, 8088, 8090, 8091, 8118, 8123, 8172, 8222,
    8243, 8280, 8281, 8333, 8443, 8500, 8834, 8880, 8888, 8983, 9000, 9043, 9060, 9080, 9090,
    9091, 9200, 9443, 9800, 9981, 12443, 16080, 18091, 18092, 20720, 28017,
];
const FALLBACK: &[u16] = &[80, 443, 8000, 8080, 8443];

/// Ports for a preset name (`s`, `m`, `l`, `x`, `full` and long forms) or a comma list.
/// Anything unrecognised gives the short web list.
pub fn port_preset(name: &str) -> Vec<u16> {
    match name.trim() {
        "small" | "s" => SMALL.to_vec(),
        "medium" | "m" => [SMALL, MEDIUM_EXTRA].concat(),
        "large" | "l" => [SMALL, MEDIUM_EXTRA, LARGE_EXTRA].concat(),
        "xlarge" | "x" => XLARGE.to_vec(),
        "full" | "f" => (1..=u16::MAX).collect(),
        other => {
            let custom: Option<Vec<u16>> = other
                .split(',')
                .map(|p| p.trim().parse::<u16>().ok().filter(|p| *p > 0))
                .collect();
            match custom {
                Some(ports) if !ports.is_empty() => ports,
                _ => FALLBACK.to_vec(),
            }
        }
    }
}

pub struct ExpandIp {
    subnet: u8,
    ports: Vec<u16>,
    parse_urls: bool,
}

impl ExpandIp {
    pub fn new(subnet: u8) -> Self {
        Self {
            subnet,
            ports: Vec::new(),
            parse_urls: true,
        }
    }

    pub fn with_ports(mut self, ports: Vec<u16>) -> Self {
        self.ports = ports;
        self
    }

    pub fn parse_urls(mut self, enabled: bool) -> Self {
        self.parse_urls = enabled;
        self
    }

    fn with_ports_for(&self, host: &str) -> Vec<String> {
        self.ports.iter().map(|p| format!("{}:{}", host, p)).collect()
    }

    fn expand_ip(&self, ip: IpAddr) -> Vec<String> {
        if self.ports.is_empty() || !self.is_host_size(ip) {
            vec![ip.to_string()]
        } else {
            self.with_ports_for(&ip.to_string())
        }
    }

    fn is_host_size(&self, ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(_) => self.subnet == 32,
            IpAddr::V6(_) => self.subnet == 32 || self.subnet == 128,
        }
    }

    /// Every subnet of size `self.subnet` inside `network`, in address order
    pub fn subnets(&self, network: IpNetwork) -> AuxResult<Vec<String>> {
        let (bits, base) = match network.network() {
            IpAddr::V4(v4) => (32u8, u32::from(v4) as u128),
            IpAddr::V6(v6) => (128u8, u128::from(v6)),
        };
        let target = if self.is_host_size(network.ip()) { bits } else { self.subnet };

        if target < network.prefix() || target > bits {
            return Err(AuxError::parse(
                network.to_string(),
                format!("cannot split into /{}", self.subnet),
            ));
        }

        let count = 1u128 << (target - network.prefix());
        if count > MAX_EXPANSION {
            return Err(AuxError::parse(network.to_string(), "range too large to expand"));
        }
        let step = if target == bits { 1 } else { 1u128 << (bits - target) };

        let mut out = Vec::new();
        for n in 0..count {
            let addr = to_addr(bits, base + n * step);
            if target == bits {
                out.extend(self.expand_ip(addr));
            } else {
                out.push(format!("{}/{}", addr, target));
            }
        }
        Ok(out)
    }

    pub fn expand(&self, line: &str) -> AuxResult<Vec<String>> {
        if let Ok(ip) = line.parse::<IpAddr>() {
            return Ok(self.expand_ip(ip));
        }

        if line.contains('/') {
            if let Ok(network) = line.parse::<IpNetwork>() {
                return self.subnets(network);
            }
        }

        if self.parse_urls && !self.ports.is_empty() {
            if let Some(host) = hostname(line, None) {
                let host = host.split(':').next().unwrap_or(&host).to_string();
                return Ok(self.with_ports_for(&host));
            }
        }

        Err(AuxError::parse(line, "not an IP, CIDR or URL"))
    }
}

fn to_addr(bits: u8, value: u128) -> IpAddr {
    if bits == 32 {
        IpAddr::V4(Ipv4Addr::from(value as u32))
    } else {
        IpAddr::V6(Ipv6Addr::from(value))
    }
}

#[async_trait]
impl Transform for ExpandIp {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let expanded = self.expand(&line)?;
        debug!(input = %line, count = expanded.len(), "Expanded");
        out.emit_all(expanded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cidr_to_addresses() {
        let out = ExpandIp::new(32).expand("10.0.0.0/30").unwrap();
        assert_eq!(out, vec!["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn test_cidr_to_subnets() {
        let out = ExpandIp::new(26).expand("10.0.0.0/24").unwrap();
        assert_eq!(
            out,
            vec!["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
        );
    }

    #[test]
    fn test_unaligned_cidr_uses_network_address() {
        let out = ExpandIp::new(32).expand("1.2.3.5/31").unwrap();
        assert_eq!(out, vec!["1.2.3.4", "1.2.3.5"]);
    }

    #[test]
    fn test_ports_appended() {
        let eip = ExpandIp::new(32).with_ports(port_preset("80,443"));
        assert_eq!(eip.expand("1.1.1.1").unwrap(), vec!["1.1.1.1:80", "1.1.1.1:443"]);
        assert_eq!(
            eip.expand("https://example.com/path").unwrap(),
            vec!["example.com:80", "example.com:443"]
        );
        assert_eq!(eip.expand("10.0.0.0/31").unwrap().len(), 4);
    }

    #[test]
    fn test_ports_ignored_for_subnets() {
        let eip = ExpandIp::new(25).with_ports(port_preset("s"));
        assert_eq!(eip.expand("10.0.0.0/24").unwrap(), vec!["10.0.0.0/25", "10.0.0.128/25"]);
    }

    #[test]
    fn test_rejects() {
        assert!(ExpandIp::new(16).expand("10.0.0.0/24").is_err());
        assert!(ExpandIp::new(32).expand("10.0.0.0/1").is_err());
        assert!(ExpandIp::new(32).expand("example.com").is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(port_preset("s").len(), 8);
        assert_eq!(port_preset("medium").len(), 18);
        assert!(port_preset("l").contains(&10250));
        assert_eq!(port_preset("full").len(), 65535);
        assert_eq!(port_preset("bogus"), vec![80, 443, 8000, 8080, 8443]);
    }
}
