// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decaying pan and zoom animations.
//!
//! Both animations are driven by an external frame clock: the caller
//! starts an animation, remembers the returned generation token, and
//! calls `tick` with that token once per frame until it returns `None`.
//! Starting a new animation bumps the generation, so ticks scheduled for
//! a superseded animation become no-ops instead of compounding.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Fraction of the remaining pan distance carried into the next frame.
const PAN_DECAY: f64 = 0.8;

/// Pan steps shorter than this are considered finished.
const PAN_EPSILON: f64 = 0.001;

/// Per-frame decay applied to the zoom velocity, pulling it toward 1.
const ZOOM_DECAY: f64 = 0.99;

/// An animated single-axis pan covering a fixed distance with
/// exponential decay.
///
/// [`start`](Self::start) takes the total distance to travel along one
/// axis. The first step is `total * (1 - PAN_DECAY)` and each later step
/// is the previous one scaled by `PAN_DECAY`, so the steps form a
/// geometric series that sums to exactly the requested distance.
///
/// Each axis gets its own slot: a viewport animates horizontal and
/// vertical pans with two independent `PanAnimation`s, so starting a pan
/// on one axis never discards in-flight travel on the other.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanAnimation {
    step: f64,
    generation: u64,
}

impl PanAnimation {
    /// Creates an idle animation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: 0.0,
            generation: 0,
        }
    }

    /// Begins a pan covering `total`, replacing any animation in flight
    /// on this axis.
    ///
    /// Returns the generation token that [`tick`](Self::tick) expects.
    pub fn start(&mut self, total: f64) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.step = total * (1.0 - PAN_DECAY);
        self.generation
    }

    /// Whether the animation still has distance left to cover.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.step.abs() >= PAN_EPSILON
    }

    /// Produces the pan delta for one frame.
    ///
    /// Returns `None` when `generation` is stale or the remaining step
    /// has decayed below the stopping threshold.
    pub fn tick(&mut self, generation: u64) -> Option<f64> {
        if generation != self.generation || !self.is_running() {
            return None;
        }
        let step = self.step;
        self.step *= PAN_DECAY;
        Some(step)
    }
}

/// An animated zoom whose per-frame factor decays toward 1.
///
/// [`start`](Self::start) takes the initial per-frame zoom factor, for
/// example the wheel zoom step. Each tick yields the current factor and
/// then moves it one decay step closer to 1; the animation finishes once
/// the factor lands inside `(ZOOM_DECAY, 1 / ZOOM_DECAY)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomAnimation {
    velocity: f64,
    generation: u64,
}

impl ZoomAnimation {
    /// Creates an idle animation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            velocity: 1.0,
            generation: 0,
        }
    }

    /// Begins a zoom at `velocity`, replacing any animation in flight.
    ///
    /// Returns the generation token that [`tick`](Self::tick) expects.
    pub fn start(&mut self, velocity: f64) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.velocity = velocity;
        self.generation
    }

    /// Whether the velocity is still outside the stopping window.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.velocity <= ZOOM_DECAY || self.velocity >= 1.0 / ZOOM_DECAY
    }

    /// Produces the zoom factor for one frame.
    ///
    /// Returns `None` when `generation` is stale or the velocity has
    /// settled inside the stopping window around 1.
    pub fn tick(&mut self, generation: u64) -> Option<f64> {
        if generation != self.generation || !self.is_running() {
            return None;
        }
        let velocity = self.velocity;
        if self.velocity > 1.0 {
            self.velocity *= ZOOM_DECAY;
        } else {
            self.velocity /= ZOOM_DECAY;
        }
        Some(velocity)
    }
}

impl Default for ZoomAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_steps_sum_to_the_requested_distance() {
        for total in [240.0, -80.0] {
            let mut anim = PanAnimation::new();
            let generation = anim.start(total);
            let mut travelled = 0.0;
            while let Some(step) = anim.tick(generation) {
                travelled += step;
            }
            assert!((travelled - total).abs() < 0.01);
        }
    }

    #[test]
    fn pan_steps_shrink_each_frame() {
        let mut anim = PanAnimation::new();
        let generation = anim.start(100.0);
        let first = anim.tick(generation).unwrap();
        let second = anim.tick(generation).unwrap();
        assert!(second.abs() < first.abs());
        assert!((second - first * 0.8).abs() < 1e-12);
    }

    #[test]
    fn stale_pan_generation_ticks_are_ignored() {
        let mut anim = PanAnimation::new();
        let old = anim.start(100.0);
        let new = anim.start(-50.0);
        assert_eq!(anim.tick(old), None);
        assert!(anim.tick(new).unwrap() < 0.0);
    }

    #[test]
    fn per_axis_slots_run_independently() {
        let mut x = PanAnimation::new();
        let mut y = PanAnimation::new();
        let y_token = y.start(100.0);
        y.tick(y_token).unwrap();
        let x_token = x.start(-60.0);

        let mut travelled_x = 0.0;
        let mut travelled_y = 20.0;
        while let Some(step) = x.tick(x_token) {
            travelled_x += step;
        }
        while let Some(step) = y.tick(y_token) {
            travelled_y += step;
        }
        assert!((travelled_x + 60.0).abs() < 0.01);
        assert!((travelled_y - 100.0).abs() < 0.01);
    }

    #[test]
    fn zoom_decays_toward_one_from_both_sides() {
        for start in [1.1, 0.9] {
            let mut anim = ZoomAnimation::new();
            let generation = anim.start(start);
            let mut frames = 0;
            let mut last = start;
            while let Some(factor) = anim.tick(generation) {
                last = factor;
                frames += 1;
                assert!(frames < 10_000);
            }
            assert!((last - 1.0).abs() < 0.03);
            assert!(!anim.is_running());
        }
    }

    #[test]
    fn stale_zoom_generation_ticks_are_ignored() {
        let mut anim = ZoomAnimation::new();
        let old = anim.start(1.1);
        let new = anim.start(0.9);
        assert_eq!(anim.tick(old), None);
        assert!(anim.tick(new).unwrap() < 1.0);
    }

    #[test]
    fn idle_animations_do_not_tick() {
        let mut pan = PanAnimation::new();
        assert_eq!(pan.tick(0), None);
        let mut zoom = ZoomAnimation::new();
        assert_eq!(zoom.tick(0), None);
    }
}
