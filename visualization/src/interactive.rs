//! Interaction primitives: zoom/pan transform and trailing-edge debouncing

use std::time::{Duration, Instant};

/// Delay applied to window resize events
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Horizontal zoom transform: a pixel `p` is displayed at `p * k + x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    /// Scale factor, within [`ZoomTransform::SCALE_EXTENT`]
    pub k: f64,
    /// Horizontal translation in pixels
    pub x: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomTransform {
    /// Allowed range of `k`
    pub const SCALE_EXTENT: (f64, f64) = (1.0, 5.0);

    pub fn identity() -> Self {
        Self { k: 1.0, x: 0.0 }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Zoom by `factor` keeping the point under `anchor_x` fixed
    pub fn scale_by(self, factor: f64, anchor_x: f64, width: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let (min_k, max_k) = Self::SCALE_EXTENT;
        let k = (self.k * factor).clamp(min_k, max_k);
        let x = anchor_x - (anchor_x - self.x) * k / self.k;
        Self { k, x }.constrain(width)
    }

    /// Pan by `dx` pixels
    pub fn pan_by(self, dx: f64, width: f64) -> Self {
        Self {
            x: self.x + dx,
            ..self
        }
        .constrain(width)
    }

    /// Keep the zoomed content covering the whole `[0, width]` viewport
    pub fn constrain(self, width: f64) -> Self {
        let min_x = width * (1.0 - self.k);
        Self {
            k: self.k,
            x: self.x.clamp(min_x.min(0.0), 0.0),
        }
    }

    pub fn apply_x(&self, pixel: f64) -> f64 {
        pixel * self.k + self.x
    }
}

/// Zoom/pan gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomGesture {
    /// Wheel or pinch: multiply the scale by `factor` around `anchor_x`
    Scale { factor: f64, anchor_x: f64 },
    /// Drag by `dx` pixels
    Pan { dx: f64 },
    /// Back to the identity transform
    Reset,
}

impl ZoomGesture {
    pub fn apply(self, transform: ZoomTransform, width: f64) -> ZoomTransform {
        match self {
            ZoomGesture::Scale { factor, anchor_x } => transform.scale_by(factor, anchor_x, width),
            ZoomGesture::Pan { dx } => transform.pan_by(dx, width),
            ZoomGesture::Reset => ZoomTransform::identity(),
        }
    }
}

/// Trailing-edge debouncer.
///
/// Each `push` replaces the pending value and restarts the delay; `poll`
/// releases the latest value once the delay has elapsed since the last push.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value becomes ready, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 1000.0;

    #[test]
    fn test_scale_clamped_to_extent() {
        let t = ZoomTransform::identity().scale_by(100.0, 500.0, WIDTH);
        assert_eq!(t.k, 5.0);
        let t = t.scale_by(0.001, 500.0, WIDTH);
        assert_eq!(t.k, 1.0);
        assert_eq!(t.x, 0.0);
    }

    #[test]
    fn test_scale_keeps_anchor_fixed() {
        let t = ZoomTransform::identity().scale_by(2.0, 400.0, WIDTH);
        assert_eq!(t.apply_x(400.0), 400.0);
        assert_eq!(t.x, -400.0);
    }

    #[test]
    fn test_pan_constrained_to_viewport() {
        let t = ZoomTransform::identity().scale_by(2.0, 0.0, WIDTH);
        assert_eq!(t.pan_by(50.0, WIDTH).x, 0.0);
        assert_eq!(t.pan_by(-5_000.0, WIDTH).x, -1000.0);
        assert_eq!(ZoomTransform::identity().pan_by(-30.0, WIDTH), ZoomTransform::identity());
    }

    #[test]
    fn test_reset_gesture() {
        let t = ZoomGesture::Scale { factor: 3.0, anchor_x: 10.0 }.apply(ZoomTransform::identity(), WIDTH);
        assert!(!t.is_identity());
        assert!(ZoomGesture::Reset.apply(t, WIDTH).is_identity());
    }

    #[test]
    fn test_debouncer_releases_only_latest_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(250));

        debouncer.push(800, start);
        debouncer.push(900, start + Duration::from_millis(100));
        debouncer.push(1000, start + Duration::from_millis(200));

        // 250ms after the first push, but only 50ms after the last
        assert_eq!(debouncer.poll(start + Duration::from_millis(250)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(450)), Some(1000));
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
        assert!(!debouncer.is_pending());
    }
}
