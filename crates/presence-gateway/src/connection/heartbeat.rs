//! Gateway heartbeat bookkeeping.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Raised when a heartbeat is due but the previous one was never acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zombie;

/// Heartbeat timer plus acknowledgement tracking for one session.
#[derive(Debug)]
pub struct Heartbeat {
    interval: Interval,
    awaiting_ack: bool,
    last_sent: Option<Instant>,
    latency: Option<Duration>,
}

impl Heartbeat {
    /// Start a heartbeat whose first beat is one full period away.
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            awaiting_ack: false,
            last_sent: None,
            latency: None,
        }
    }

    /// Wait until the next beat is due.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Record that a heartbeat is being sent.
    ///
    /// Fails if the previous heartbeat is still unacknowledged.
    pub fn beat(&mut self) -> Result<(), Zombie> {
        if self.awaiting_ack {
            return Err(Zombie);
        }
        self.awaiting_ack = true;
        self.last_sent = Some(Instant::now());
        Ok(())
    }

    /// Record a HeartbeatAck.
    pub fn acknowledge(&mut self) {
        self.awaiting_ack = false;
        if let Some(sent) = self.last_sent {
            self.latency = Some(sent.elapsed());
        }
    }

    /// Round trip of the last acknowledged heartbeat.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let mut heartbeat = Heartbeat::new(Duration::from_secs(40));
        let start = Instant::now();
        heartbeat.tick().await;
        assert!(start.elapsed() >= Duration::from_secs(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ack_records_latency() {
        let mut heartbeat = Heartbeat::new(Duration::from_secs(40));
        heartbeat.beat().unwrap();
        time::advance(Duration::from_millis(120)).await;
        heartbeat.acknowledge();
        assert_eq!(heartbeat.latency(), Some(Duration::from_millis(120)));
        assert!(heartbeat.beat().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_ack_is_zombie() {
        let mut heartbeat = Heartbeat::new(Duration::from_secs(40));
        heartbeat.beat().unwrap();
        assert_eq!(heartbeat.beat(), Err(Zombie));
    }
}
