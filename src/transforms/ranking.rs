// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, GroupedSink, Transform};
use crate::rank::{Rank, RankClient};
use crate::target::hostname;

/// `domain,rank` for every input; a failed lookup prints nothing
pub struct RankLine {
    ranks: RankClient,
}

impl RankLine {
    pub fn new(ranks: RankClient) -> Self {
        Self { ranks }
    }
}

#[async_trait]
impl Transform for RankLine {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let rank = self.ranks.rank(&line).await?;
        out.emit(format!("{},{}", line, rank)).await
    }
}

/// Emits `(rank, host)` for a [`GroupedSink`] to order; `host:port` is ranked as written
pub struct RankSort {
    ranks: RankClient,
}

impl RankSort {
    pub fn new(ranks: RankClient) -> Self {
        Self { ranks }
    }
}

#[async_trait]
impl Transform for RankSort {
    type Output = (Rank, String);

    async fn apply(&self, line: String, out: &Emitter<(Rank, String)>) -> AuxResult<()> {
        let host = hostname(&line, None).ok_or_else(|| AuxError::parse(line.as_str(), "no host"))?;
        let rank = self.ranks.rank(&host).await?;
        out.emit((rank, host)).await
    }
}

/// Hosts in numeric rank order, so unranked (-1) first; `host,rank` when verbose
pub fn rank_sort_sink<W>(writer: W, verbose: bool) -> GroupedSink<Rank, W>
where
    W: std::io::Write + Send + 'static,
{
    GroupedSink::new(writer).with_render(move |rank: &Rank, host: &str| {
        if verbose {
            format!("{},{}", host, rank)
        } else {
            host.to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Sink;

    #[test]
    fn test_rank_sort_sink_order() {
        let mut sink = rank_sort_sink(Vec::new(), true);
        sink.accept((Rank::Unranked, "z.com".to_string())).unwrap();
        sink.accept((Rank::Ranked(10), "b.com".to_string())).unwrap();
        sink.accept((Rank::Ranked(2), "a.com".to_string())).unwrap();
        sink.accept((Rank::Ranked(10), "c.com".to_string())).unwrap();
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "z.com,-1\na.com,2\nb.com,10\nc.com,10\n");
    }
}
