// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! One module per tool family. Pipeline tools expose a `Transform`;
//! whole-input tools (`ffclean`, `bparse`, `chrunk`, `jjoin`) expose plain functions.

pub mod archive;
pub mod bparse;
pub mod cdnfilter;
pub mod cert;
pub mod chrunk;
pub mod cleansub;
pub mod dedup;
pub mod eip;
pub mod favicon;
pub mod ffclean;
pub mod ghd;
pub mod html;
pub mod purl;
pub mod ranking;
pub mod resolve;
pub mod screenshot;
pub mod text;
pub mod urp;

pub use archive::{archive_http_config, ArchiveOutput, ArchiveSources, ArchiveUrls};
pub use cdnfilter::{CdnFilter, CdnSplitSink};
pub use cert::CertInfo;
pub use chrunk::ShellCommand;
pub use cleansub::CleanSub;
pub use dedup::{ColumnUnique, DedupUrl, JsonUnique};
pub use eip::ExpandIp;
pub use favicon::FaviconInfo;
pub use ghd::Dorks;
pub use html::HtmlParse;
pub use purl::{PurlMode, UrlParts};
pub use ranking::{RankLine, RankSort};
pub use resolve::{GetIp, JustResolved, ReverseDns, TldFinder};
pub use screenshot::{OpenInChrome, Screenshot};
pub use text::{NotIn, ReplacePattern, StrReplace, WordLimit};
pub use urp::UrlReplace;
