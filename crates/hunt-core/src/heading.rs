//! Heading fusion and smoothing.
//!
//! Orientation hardware is noisy and unevenly available: an absolute
//! compass reading may drop out while a tilt-derived approximation or
//! the last camera facing is still usable. The stabilizer polls an
//! ordered chain of sources once per tick, takes the first
//! non-degenerate sample, and smooths it along the shortest arc across
//! the 0/360 boundary. It also captures the one-shot session baseline
//! that anchors every egocentric mapper.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::geo::{normalize_deg, shortest_arc_deg};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingSample {
    /// Compass degrees, 0 = north.
    pub degrees: f64,
    /// Source-reported confidence in [0, 1].
    pub confidence: f64,
}

/// One orientation fallback. Sources are polled in registration order
/// each tick; the first non-degenerate sample wins for that tick.
pub trait HeadingSource {
    fn name(&self) -> &'static str;
    /// Non-blocking poll. `None` when the source has nothing this tick.
    fn sample(&mut self) -> Option<HeadingSample>;
}

/// Single-slot source for platform sensor callbacks: the callback
/// publishes into the slot, the stabilizer drains it once per tick.
/// Clone handles share the slot (single-threaded core, so `Rc`).
#[derive(Clone)]
pub struct SharedHeadingSlot {
    name: &'static str,
    slot: Rc<RefCell<Option<HeadingSample>>>,
}

impl SharedHeadingSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn publish(&self, sample: HeadingSample) {
        *self.slot.borrow_mut() = Some(sample);
    }

    pub fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

impl HeadingSource for SharedHeadingSlot {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sample(&mut self) -> Option<HeadingSample> {
        self.slot.borrow_mut().take()
    }
}

/// Smoothed per-tick heading. `degraded` is set when every source was
/// degenerate this tick and the estimate is coasting on its last value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingEstimate {
    pub degrees: f64,
    pub confidence: f64,
    pub degraded: bool,
}

/// Captured once per session; immutable until an explicit reset.
/// `defaulted` marks the 0-degree fallback taken when no confident
/// absolute reading arrived before the capture deadline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingBaseline {
    pub degrees: f64,
    pub defaulted: bool,
}

pub struct HeadingStabilizer {
    sources: Vec<Box<dyn HeadingSource>>,
    tau_sec: f64,
    confidence_floor: f64,
    baseline_min_confidence: f64,
    capture_deadline_sec: f64,

    smoothed_deg: f64,
    initialized: bool,
    confidence: f64,
    baseline: Option<HeadingBaseline>,
    capture_started_sec: Option<f64>,
}

impl HeadingStabilizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            sources: Vec::new(),
            tau_sec: config.heading_tau_sec,
            confidence_floor: config.heading_confidence_floor,
            baseline_min_confidence: config.baseline_min_confidence,
            capture_deadline_sec: config.baseline_capture_deadline_sec,
            smoothed_deg: 0.0,
            initialized: false,
            confidence: 0.0,
            baseline: None,
            capture_started_sec: None,
        }
    }

    /// Register a fallback source. Registration order is priority order.
    pub fn add_source(&mut self, source: Box<dyn HeadingSource>) {
        self.sources.push(source);
    }

    pub fn baseline(&self) -> Option<HeadingBaseline> {
        self.baseline
    }

    /// Drop the captured baseline and restart the capture clock.
    pub fn reset_session(&mut self, now_sec: f64) {
        log::info!("heading: session reset, recapturing baseline");
        self.baseline = None;
        self.capture_started_sec = Some(now_sec);
    }

    /// Poll the fallback chain and advance the smoothed estimate.
    pub fn tick(&mut self, dt_sec: f64, now_sec: f64) -> HeadingEstimate {
        if self.baseline.is_none() && self.capture_started_sec.is_none() {
            self.capture_started_sec = Some(now_sec);
        }

        let mut chosen: Option<(&'static str, HeadingSample)> = None;
        for source in &mut self.sources {
            if let Some(sample) = source.sample() {
                if sample.degrees.is_finite() && sample.confidence >= self.confidence_floor {
                    chosen = Some((source.name(), sample));
                    break;
                }
            }
        }

        match chosen {
            Some((name, sample)) => {
                let raw = normalize_deg(sample.degrees);
                if self.initialized {
                    let alpha = 1.0 - (-dt_sec / self.tau_sec).exp();
                    let step = shortest_arc_deg(self.smoothed_deg, raw) * alpha;
                    self.smoothed_deg = normalize_deg(self.smoothed_deg + step);
                } else {
                    self.smoothed_deg = raw;
                    self.initialized = true;
                }
                self.confidence = sample.confidence;

                if self.baseline.is_none() && sample.confidence >= self.baseline_min_confidence {
                    log::info!(
                        "heading: baseline captured at {:.1} deg from '{}'",
                        raw,
                        name
                    );
                    self.baseline = Some(HeadingBaseline {
                        degrees: raw,
                        defaulted: false,
                    });
                    self.capture_started_sec = None;
                }
            }
            None => {
                // Coast on the last estimate; callers see the flag and
                // can dim the compass.
                return self.finish_tick(now_sec, true);
            }
        }

        self.finish_tick(now_sec, false)
    }

    fn finish_tick(&mut self, now_sec: f64, degraded: bool) -> HeadingEstimate {
        if self.baseline.is_none() {
            if let Some(started) = self.capture_started_sec {
                if now_sec - started >= self.capture_deadline_sec {
                    log::warn!(
                        "heading: no confident reading within {:.1}s, baseline defaults to 0 deg",
                        self.capture_deadline_sec
                    );
                    self.baseline = Some(HeadingBaseline {
                        degrees: 0.0,
                        defaulted: true,
                    });
                    self.capture_started_sec = None;
                    if !self.initialized {
                        self.smoothed_deg = 0.0;
                        self.initialized = true;
                    }
                }
            }
        }
        HeadingEstimate {
            degrees: self.smoothed_deg,
            confidence: self.confidence,
            degraded,
        }
    }
}
