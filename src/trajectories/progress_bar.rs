//! Progress reporting for batch stay detection.
//!
//! [`BatchProgress`] is the single hook used by the batch loops. With the `progress`
//! feature it drives an `indicatif` bar whose message shows the duration of the last
//! trajectory and a smoothed **exponential moving average** (EMA) of it; without the
//! feature every method is a no-op and compiles away.
//!
//! The EMA update rule is `ema ← α·dt + (1–α)·ema` with `α ∈ (0,1]`; the first tick
//! initializes the average to the first duration.

#[cfg(feature = "progress")]
use std::time::{Duration, Instant};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Smoothing factor of the per-trajectory timing average.
#[cfg(feature = "progress")]
const EMA_ALPHA: f64 = 0.2;

#[cfg(feature = "progress")]
pub(crate) struct IterTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    count: u64,
}

#[cfg(feature = "progress")]
impl IterTimer {
    pub(crate) fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.count += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.count == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };

        dt
    }

    #[inline]
    pub(crate) fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }
}

#[cfg(feature = "progress")]
#[inline]
pub(crate) fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else {
        let ms = d.as_millis();
        if ms < 1_000 {
            format!("{ms}ms")
        } else {
            format!("{:.2}s", d.as_secs_f32())
        }
    }
}

/// Progress hook of one batch run over `total` trajectories.
pub(crate) struct BatchProgress {
    #[cfg(feature = "progress")]
    bar: ProgressBar,
    #[cfg(feature = "progress")]
    timer: IterTimer,
}

impl BatchProgress {
    #[cfg(feature = "progress")]
    pub(crate) fn new(total: usize) -> Self {
        let bar = ProgressBar::new((total as u64).max(1));
        // The template is a literal; a parse failure falls back to the default style.
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
        ) {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(200));
        BatchProgress {
            bar,
            timer: IterTimer::new(EMA_ALPHA),
        }
    }

    #[cfg(not(feature = "progress"))]
    pub(crate) fn new(_total: usize) -> Self {
        BatchProgress {}
    }

    /// Mark one trajectory as processed.
    #[inline]
    pub(crate) fn tick(&mut self) {
        #[cfg(feature = "progress")]
        {
            let last = self.timer.tick();
            let avg = self.timer.avg();
            self.bar
                .set_message(format!("last: {}, avg: {}", fmt_dur(last), fmt_dur(avg)));
            self.bar.inc(1);
        }
    }

    pub(crate) fn interrupted(&self) {
        #[cfg(feature = "progress")]
        self.bar.set_message("Interrupted");
    }

    pub(crate) fn finish(self) {
        #[cfg(feature = "progress")]
        {
            self.bar.disable_steady_tick();
            self.bar.finish_and_clear();
        }
    }
}
