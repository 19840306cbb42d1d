// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Output side of the pipeline. A sink is owned by exactly one task, so
//! dedup sets, grouping maps and writers need no locking.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::io::Write;

use crate::errors::AuxResult;

pub trait Sink<T>: Send + 'static {
    fn accept(&mut self, item: T) -> AuxResult<()>;

    /// Called once after the last item
    fn finish(&mut self) -> AuxResult<()> {
        Ok(())
    }
}

/// Writes `item\n` and flushes, optionally only the first time a line is seen
pub struct LineSink<W> {
    writer: W,
    seen: Option<HashSet<String>>,
}

impl LineSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, seen: None }
    }

    pub fn unique(mut self) -> Self {
        self.seen = Some(HashSet::new());
        self
    }

    pub fn unique_if(self, unique: bool) -> Self {
        if unique {
            self.unique()
        } else {
            self
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<T, W> Sink<T> for LineSink<W>
where
    T: Display + Send + 'static,
    W: Write + Send + 'static,
{
    fn accept(&mut self, item: T) -> AuxResult<()> {
        let line = item.to_string();

        if let Some(seen) = self.seen.as_mut() {
            if !seen.insert(line.clone()) {
                return Ok(());
            }
        }

        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> AuxResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Takes `(key, line)` and writes `line` the first time `key` shows up
pub struct KeyedUniqueSink<W> {
    writer: W,
    seen: HashSet<String>,
    digest_keys: bool,
}

impl KeyedUniqueSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> KeyedUniqueSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            seen: HashSet::new(),
            digest_keys: false,
        }
    }

    /// Store SHA-256 digests instead of the keys themselves
    pub fn digest_keys(mut self) -> Self {
        self.digest_keys = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn remember(&mut self, key: String) -> bool {
        let key = if self.digest_keys {
            hex_digest(&key)
        } else {
            key
        };
        self.seen.insert(key)
    }
}

impl<W: Write + Send + 'static> Sink<(String, String)> for KeyedUniqueSink<W> {
    fn accept(&mut self, (key, line): (String, String)) -> AuxResult<()> {
        if !self.remember(key) {
            return Ok(());
        }
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> AuxResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

type Render<K> = Box<dyn Fn(&K, &str) -> String + Send>;

/// Buffers `(key, line)` pairs and writes them grouped by ascending key on finish.
/// Lines keep their arrival order inside a group.
pub struct GroupedSink<K, W> {
    writer: W,
    groups: BTreeMap<K, Vec<String>>,
    render: Render<K>,
}

impl<K: Ord + Send + 'static> GroupedSink<K, std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<K: Ord + Send + 'static, W: Write + Send + 'static> GroupedSink<K, W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            groups: BTreeMap::new(),
            render: Box::new(|_, line| line.to_string()),
        }
    }

    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&K, &str) -> String + Send + 'static,
    {
        self.render = Box::new(render);
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<K: Ord + Send + 'static, W: Write + Send + 'static> Sink<(K, String)> for GroupedSink<K, W> {
    fn accept(&mut self, (key, line): (K, String)) -> AuxResult<()> {
        self.groups.entry(key).or_default().push(line);
        Ok(())
    }

    fn finish(&mut self) -> AuxResult<()> {
        let groups = std::mem::take(&mut self.groups);
        for (key, lines) in &groups {
            for line in lines {
                writeln!(self.writer, "{}", (self.render)(key, line))?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps everything in memory
#[derive(Debug)]
pub struct CollectSink<T> {
    items: Vec<T>,
}

impl<T> Default for CollectSink<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> CollectSink<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: Send + 'static> Sink<T> for CollectSink<T> {
    fn accept(&mut self, item: T) -> AuxResult<()> {
        self.items.push(item);
        Ok(())
    }
}

fn hex_digest(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_line_sink_unique_keeps_first_seen_order() {
        let mut sink = LineSink::new(Vec::new()).unique();
        for item in ["a.com", "a.com", "b.com", "a.com"] {
            sink.accept(item).unwrap();
        }
        Sink::<&str>::finish(&mut sink).unwrap();
        assert_eq!(written(sink.into_inner()), vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_line_sink_plain_keeps_duplicates() {
        let mut sink = LineSink::new(Vec::new());
        sink.accept(1u32).unwrap();
        sink.accept(1u32).unwrap();
        assert_eq!(written(sink.into_inner()), vec!["1", "1"]);
    }

    #[test]
    fn test_keyed_unique_sink_with_digest() {
        let mut sink = KeyedUniqueSink::new(Vec::new()).digest_keys();
        sink.accept(("k1".into(), "first".into())).unwrap();
        sink.accept(("k1".into(), "second".into())).unwrap();
        sink.accept(("k2".into(), "third".into())).unwrap();
        assert_eq!(written(sink.into_inner()), vec!["first", "third"]);
    }

    #[test]
    fn test_grouped_sink_orders_keys_and_keeps_group_order() {
        let mut sink = GroupedSink::new(Vec::new()).with_render(|k: &u32, l| format!("{},{}", l, k));
        sink.accept((20, "b".to_string())).unwrap();
        sink.accept((10, "a".to_string())).unwrap();
        sink.accept((20, "c".to_string())).unwrap();
        sink.finish().unwrap();
        assert_eq!(written(sink.into_inner()), vec!["a,10", "b,20", "c,20"]);
    }

    #[test]
    fn test_hex_digest() {
        assert_eq!(
            hex_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
