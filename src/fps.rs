use std::collections::VecDeque;

/// how many recent frame samples feed the mean
const WINDOW: usize = 100;

/// One frame's worth of rate measurement, in frames per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSample {
    pub instantaneous: f64,
    pub mean: f64,
}

impl FpsSample {
    /// the text the fps panel shows, e.g. `fps: 60 (59)`
    pub fn panel_text(&self) -> String {
        format!("fps: {} ({})", self.instantaneous.round(), self.mean.round())
    }
}

/// Rolling frame-rate monitor. Keeps the last `WINDOW` instantaneous
/// rates, oldest evicted first, and reports the mean over what it holds.
/// Fed millisecond timestamps rather than reading a clock, so callers own
/// time and tests can fabricate it.
pub struct FrameRateMonitor {
    window: VecDeque<f64>,
    last_ms: f64,
}

impl FrameRateMonitor {
    /// `now_ms` seeds the previous-frame timestamp so the first recorded
    /// delta is well-formed
    pub fn new(now_ms: f64) -> Self {
        FrameRateMonitor {
            window: VecDeque::with_capacity(WINDOW),
            last_ms: now_ms,
        }
    }

    pub fn record(&mut self, now_ms: f64) -> FpsSample {
        let delta = now_ms - self.last_ms;
        self.last_ms = now_ms;
        // never divide by a zero delta; fall back to what the window says
        let instantaneous = if delta > 0.0 {
            1000.0 / delta
        } else {
            self.mean()
        };
        self.window.push_back(instantaneous);
        if self.window.len() > WINDOW {
            self.window.pop_front();
        }
        FpsSample {
            instantaneous,
            mean: self.mean(),
        }
    }

    fn mean(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().sum::<f64>() / self.window.len() as f64
        }
    }
}
