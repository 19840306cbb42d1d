// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Certificate SAN extraction (cinfo).

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use x509_parser::prelude::{parse_x509_certificate, GeneralName};

use crate::errors::{AuxError, AuxResult};
use crate::http_client::HttpClient;
use crate::pipeline::{Emitter, Transform};
use crate::rank::RankClient;
use crate::target::hostname;

pub const DEFAULT_EXTRA_PORTS: &str = "443,8443,9443";

/// Names and subject pulled from a leaf certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertSummary {
    pub subject: String,
    pub dns_names: Vec<String>,
}

pub fn summarize_der(der: &[u8]) -> AuxResult<CertSummary> {
    let (_, cert) = parse_x509_certificate(der)
        .map_err(|e| AuxError::parse("certificate", e.to_string()))?;

    let mut dns_names = Vec::new();
    if let Ok(Some(san)) = cert.subject_alternative_name() {
        for name in &san.value.general_names {
            if let GeneralName::DNSName(dns) = name {
                dns_names.push(dns.to_string());
            }
        }
    }

    Ok(CertSummary {
        subject: cert.subject().to_string(),
        dns_names,
    })
}

#[derive(Debug, Serialize)]
struct CertRecord<'a> {
    input: &'a str,
    domains: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    info: String,
}

pub struct CertInfo {
    http: HttpClient,
    ranks: Option<RankClient>,
    extra_ports: Option<Vec<String>>,
    json: bool,
    verbose: bool,
}

impl CertInfo {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            ranks: None,
            extra_ports: None,
            json: false,
            verbose: false,
        }
    }

    pub fn with_ranks(mut self, ranks: Option<RankClient>) -> Self {
        self.ranks = ranks;
        self
    }

    /// Also probe `host:port` for each port of a comma list
    pub fn with_extra_ports(mut self, ports: Option<&str>) -> Self {
        self.extra_ports = ports.map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        });
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns false when no certificate could be fetched from `address`
    async fn certs_for(&self, address: &str, out: &Emitter<String>) -> AuxResult<bool> {
        let der = match self.http.peer_certificate(&format!("https://{}", address)).await {
            Ok(Some(der)) => der,
            Ok(None) => return Ok(false),
            Err(e) => {
                debug!(address = address, error = %e, "TLS fetch failed");
                return Ok(false);
            }
        };

        let summary = summarize_der(&der)?;

        if self.verbose && !self.json {
            eprintln!("{} - {}", address, summary.subject);
        }

        let mut rows = Vec::with_capacity(summary.dns_names.len());
        for domain in &summary.dns_names {
            let row = match &self.ranks {
                Some(ranks) => {
                    let rank = match ranks.rank_root(domain).await {
                        Ok(rank) => rank.to_string(),
                        Err(e) => {
                            debug!(domain = %domain, error = %e, "Rank lookup failed");
                            String::new()
                        }
                    };
                    format!("{},{},{}", address, domain, rank)
                }
                None if self.json => domain.clone(),
                None => format!("{},{}", address, domain),
            };
            rows.push(row);
        }

        if self.json {
            let record = CertRecord {
                input: address,
                domains: rows,
                info: if self.verbose {
                    summary.subject
                } else {
                    String::new()
                },
            };
            out.emit(serde_json::to_string(&record)?).await?;
        } else {
            out.emit_all(rows).await?;
        }

        Ok(true)
    }
}

#[async_trait]
impl Transform for CertInfo {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let host = hostname(&line, None).ok_or_else(|| AuxError::parse(line.as_str(), "no host"))?;

        if let Some(ports) = &self.extra_ports {
            let bare = host.split(':').next().unwrap_or(&host).to_string();
            for port in ports {
                self.certs_for(&format!("{}:{}", bare, port), out).await?;
            }
        }

        if !self.certs_for(&host, out).await? {
            if let Some(fallback) = hostname(&line, Some("443")) {
                if fallback != host {
                    self.certs_for(&fallback, out).await?;
                }
            }
        }

        Ok(())
    }
}
