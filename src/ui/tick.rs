//! The clock that drives periodic rendering.
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Yields once per render period.
#[async_trait]
pub trait TickSource: Send {
    async fn tick(&mut self);
}

/// A [`TickSource`] backed by a tokio interval.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl TickSource for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// A tick source that only fires when the test tells it to.
#[cfg(test)]
pub struct ManualTicker {
    rx: tokio::sync::mpsc::UnboundedReceiver<()>,
}

#[cfg(test)]
impl ManualTicker {
    pub fn new() -> (tokio::sync::mpsc::UnboundedSender<()>, Self) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[cfg(test)]
#[async_trait]
impl TickSource for ManualTicker {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}
