//! Floating motion for the hero preview.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::Scene;

/// Drift amplitude per tick, in scene pixels.
pub const DRIFT: f32 = 0.5;

/// Time scale applied to the millisecond clock.
pub const TIME_SCALE: f64 = 0.001;

/// Drifts every point of a scene along a slow Lissajous-like path.
///
/// Point `k` (1-based) moves by `(sin(t·0.001 + k)·0.5, cos(t·0.001 + 0.7k)·0.5)`
/// on each tick. Motion accumulates, so the path depends on the tick rate.
#[derive(Debug, Clone)]
pub struct FloatingAnimation {
    alive: Arc<AtomicBool>,
}

/// Cancels a [`FloatingAnimation`] from anywhere.
#[derive(Debug, Clone)]
pub struct AnimationHandle {
    alive: Arc<AtomicBool>,
}

impl AnimationHandle {
    /// Stop the animation. Later ticks leave the scene untouched.
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Whether [`AnimationHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }
}

impl FloatingAnimation {
    /// Start a new animation and return it with its cancel handle.
    #[must_use]
    pub fn start() -> (Self, AnimationHandle) {
        let alive = Arc::new(AtomicBool::new(true));
        let handle = AnimationHandle {
            alive: Arc::clone(&alive),
        };
        (Self { alive }, handle)
    }

    /// Whether the animation still runs.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Advance every point for display time `t_ms`.
    ///
    /// Returns `false` without touching the scene once cancelled.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn tick(&self, scene: &mut Scene, t_ms: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        let t = t_ms * TIME_SCALE;
        for (i, point) in scene.points_mut().enumerate() {
            let k = (i + 1) as f64;
            point.x += (t + k).sin() as f32 * DRIFT;
            point.y += (t + k * 0.7).cos() as f32 * DRIFT;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_moves_points_by_ordinal() {
        let mut scene = Scene::hero();
        let before = scene.points().to_vec();
        let (anim, _handle) = FloatingAnimation::start();

        assert!(anim.tick(&mut scene, 0.0));

        for (k, (old, new)) in before.iter().zip(scene.points()).enumerate() {
            let k = (k + 1) as f32;
            assert!((new.x - old.x - k.sin() * 0.5).abs() < 1e-4);
            assert!((new.y - old.y - (k * 0.7).cos() * 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cancelled_animation_is_inert() {
        let mut scene = Scene::hero();
        let (anim, handle) = FloatingAnimation::start();
        handle.cancel();

        let before = scene.clone();
        assert!(!anim.tick(&mut scene, 1234.0));
        assert_eq!(scene, before);
        assert!(handle.is_cancelled());
        assert!(!anim.is_running());
    }

    #[test]
    fn test_drift_stays_bounded_per_tick() {
        let mut scene = Scene::hero();
        let (anim, _handle) = FloatingAnimation::start();
        let before = scene.points().to_vec();
        anim.tick(&mut scene, 98_765.0);
        for (old, new) in before.iter().zip(scene.points()) {
            assert!((new.x - old.x).abs() <= DRIFT + 1e-6);
            assert!((new.y - old.y).abs() <= DRIFT + 1e-6);
        }
    }
}
