use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use tokio::{task::JoinHandle, time::interval};

pub static METER: Meter = Meter::new();

/// Throughput counters for the two frame streams.
pub struct Meter {
    pub raw: FrameCounter,
    pub annotated: FrameCounter,
}

impl Meter {
    pub const fn new() -> Meter {
        Meter {
            raw: FrameCounter::new("Raw"),
            annotated: FrameCounter::new("Annotated"),
        }
    }
}

/// Counter for one frame stream, drained on every report.
pub struct FrameCounter {
    frames: AtomicU64,
    label: &'static str,
}

impl FrameCounter {
    pub const fn new(label: &'static str) -> Self {
        Self {
            frames: AtomicU64::new(0),
            label,
        }
    }

    pub fn tick(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_reset(&self) -> u64 {
        self.frames.swap(0, Ordering::Relaxed)
    }

    fn log_rate(&self, elapsed: f32) {
        let frames = self.get_reset();
        if frames > 0 {
            let fps = frames as f32 / elapsed;
            log::info!("{} frames per second: {fps:.2}", self.label);
        }
    }
}

pub fn spawn_meter_logger() -> JoinHandle<()> {
    tokio::spawn(async {
        let mut log_interval = interval(Duration::from_secs(2));
        log_interval.tick().await;

        loop {
            let start = Instant::now();
            log_interval.tick().await;

            let elapsed = start.elapsed().as_secs_f32();
            METER.raw.log_rate(elapsed);
            METER.annotated.log_rate(elapsed);
        }
    })
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn counter_drains_on_read() {
        let counter = FrameCounter::new("Test");
        counter.tick();
        counter.tick();

        assert_eq!(counter.get_reset(), 2);
        assert_eq!(counter.get_reset(), 0);
    }
}
