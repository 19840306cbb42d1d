// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::report::Counters;
use crate::errors::{AuxError, AuxResult};

/// Per-line work plugged into the pipeline.
///
/// `apply` may emit zero or more items. Returning `Err` marks the line as
/// failed; the pipeline logs it at debug level and carries on with the next
/// line. `AuxError::ChannelClosed` is the only error that stops a worker.
#[async_trait]
pub trait Transform: Send + Sync + 'static {
    type Output: Send + 'static;

    async fn apply(&self, line: String, out: &Emitter<Self::Output>) -> AuxResult<()>;
}

/// Handle onto the result channel
pub struct Emitter<T> {
    tx: mpsc::Sender<T>,
    counters: Arc<Counters>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<T: Send + 'static> Emitter<T> {
    pub(crate) fn new(tx: mpsc::Sender<T>, counters: Arc<Counters>) -> Self {
        Self { tx, counters }
    }

    /// Hand one item to the sink, waiting for channel capacity
    pub async fn emit(&self, item: T) -> AuxResult<()> {
        self.tx
            .send(item)
            .await
            .map_err(|_| AuxError::ChannelClosed)?;
        self.counters.item_emitted();
        Ok(())
    }

    pub async fn emit_all<I>(&self, items: I) -> AuxResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.emit(item).await?;
        }
        Ok(())
    }
}

/// Closure-backed transform: every item of the returned Vec is emitted
pub struct FnTransform<F, O> {
    f: F,
    _output: PhantomData<fn() -> O>,
}

pub fn from_fn<F, Fut, O>(f: F) -> FnTransform<F, O>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AuxResult<Vec<O>>> + Send + 'static,
    O: Send + 'static,
{
    FnTransform {
        f,
        _output: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, O> Transform for FnTransform<F, O>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AuxResult<Vec<O>>> + Send + 'static,
    O: Send + 'static,
{
    type Output = O;

    async fn apply(&self, line: String, out: &Emitter<O>) -> AuxResult<()> {
        let items = (self.f)(line).await?;
        out.emit_all(items).await
    }
}

#[async_trait]
impl<T: Transform> Transform for Arc<T> {
    type Output = T::Output;

    async fn apply(&self, line: String, out: &Emitter<Self::Output>) -> AuxResult<()> {
        (**self).apply(line, out).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_transform_emits_every_item() {
        let (tx, mut rx) = mpsc::channel(8);
        let counters = Arc::new(Counters::default());
        let emitter = Emitter::new(tx, Arc::clone(&counters));

        let transform = from_fn(|line: String| async move {
            Ok(vec![format!("{}-1", line), format!("{}-2", line)])
        });
        transform.apply("x".to_string(), &emitter).await.unwrap();
        drop(emitter);

        let mut got = Vec::new();
        while let Some(item) = rx.recv().await {
            got.push(item);
        }
        assert_eq!(got, vec!["x-1", "x-2"]);
        assert_eq!(counters.snapshot().emitted, 2);
    }

    #[tokio::test]
    async fn test_emit_after_sink_gone() {
        let (tx, rx) = mpsc::channel::<u32>(1);
        drop(rx);
        let emitter = Emitter::new(tx, Arc::new(Counters::default()));
        assert!(matches!(emitter.emit(1).await, Err(AuxError::ChannelClosed)));
    }
}
