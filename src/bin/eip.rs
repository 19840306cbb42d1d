// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * eip - Standalone Binary
 * Expands CIDRs into subnets or addresses, optionally appending ports
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::{ArgAction, Parser};

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::eip::port_preset;
use auxs::transforms::ExpandIp;

#[derive(Parser, Debug)]
#[command(name = "eip")]
#[command(about = "Extract IPs and subnets from CIDR ranges", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// CIDR subnet size of the output (32 prints plain addresses)
    #[arg(short = 's', long = "subnet", default_value_t = 32)]
    subnet: u8,

    /// Append ports: s, m, l, x, full (or small, medium, large, xlarge) or a comma list
    #[arg(short = 'p', long = "ports")]
    ports: Option<String>,

    /// Expand URL inputs to host:port too (only with -p)
    #[arg(short = 'U', long = "urls", default_value_t = true, action = ArgAction::Set)]
    urls: bool,

    /// Unique results
    #[arg(short = 'u', long = "unique", default_value_t = true, action = ArgAction::Set)]
    unique: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    if args.subnet > 128 {
        anyhow::bail!("Subnet size must be between 0 and 128, got {}", args.subnet);
    }

    let mut transform = ExpandIp::new(args.subnet).parse_urls(args.urls);
    if let Some(preset) = &args.ports {
        transform = transform.with_ports(port_preset(preset));
    }

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline
        .run(cli::stdin_source(), LineSink::stdout().unique_if(args.unique))
        .await?;
    Ok(())
}
