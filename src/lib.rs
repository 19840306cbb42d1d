// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Recon Utilities Library
 * Line pipeline, shared network services and the per-tool transforms
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

// Pipeline core
pub mod pipeline;

// Production error handling and resilience modules
pub mod errors;
pub mod retry;

// Configuration and CLI plumbing
pub mod cli;
pub mod config;

// Shared services
pub mod browser;
pub mod cdn;
pub mod dns;
pub mod favicon;
pub mod http_client;
pub mod rank;
pub mod suffix;
pub mod target;

// Tool transforms
pub mod transforms;

pub use errors::{AuxError, AuxResult};
pub use pipeline::{LineSource, Pipeline, PipelineReport};
