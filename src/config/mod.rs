// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod core;
pub mod loader;
pub mod validation;

pub use core::{
    AuxConfig, DnsConfig, DnsProtocol, HttpConfig, PipelineConfig, RankConfig, RetrySettings,
    DEFAULT_CONCURRENCY,
};

pub use loader::{expand_home, load_or_default, ConfigFormat, ConfigLoader};

pub use validation::ConfigValidator;
