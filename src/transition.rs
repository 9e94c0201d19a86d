//! Easing curves and the camera position tween.

use glam::Vec3;

/// Easing functions for tweens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    #[default]
    Linear,
    /// Start slow, accelerate (quadratic, the "power1.in" curve).
    EaseIn,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
        }
    }
}

/// One step of a running tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenStep {
    /// Interpolated value after the step.
    pub value: Vec3,
    /// The tween reached its end on this step.
    pub finished: bool,
}

/// Time-driven interpolation of a point from `from` to `to`.
///
/// The tween is advanced by real elapsed seconds, independently of the
/// fixed-step animation clock, so it lasts `duration` seconds regardless of
/// frame rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub from: Vec3,
    pub to: Vec3,
    /// Duration in seconds.
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            easing: Easing::Linear,
            elapsed: 0.0,
        }
    }

    /// Set the easing function for this tween.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Current interpolated value.
    pub fn value(&self) -> Vec3 {
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    /// Advance by `dt` seconds.
    ///
    /// The final step lands exactly on `to`.
    pub fn advance(&mut self, dt: f32) -> TweenStep {
        self.elapsed += dt.max(0.0);
        let finished = self.is_finished();
        let value = if finished { self.to } else { self.value() };
        TweenStep { value, finished }
    }
}
