//! Animates item transforms toward the latest layout snapshot

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use sn_core::{Scale, Transform};
use tracing::trace;

use crate::frame::LayoutSnapshot;
use crate::positioner::AnimationConfig;

/// Largest integration step for springs
const SPRING_SUBSTEP: f32 = 1.0 / 120.0;
const REST_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    Started,
    Settled,
}

#[derive(Debug, Clone, Copy, Default)]
struct Channel {
    current: Vec3,
    from: Vec3,
    target: Vec3,
    velocity: Vec3,
}

impl Channel {
    fn at(value: Vec3) -> Self {
        Self {
            current: value,
            from: value,
            target: value,
            velocity: Vec3::ZERO,
        }
    }

    fn retarget(&mut self, target: Vec3) {
        self.from = self.current;
        self.target = target;
    }

    fn at_rest(&self) -> bool {
        (self.target - self.current).abs().max_element() < REST_EPSILON
            && self.velocity.abs().max_element() < REST_EPSILON
    }

    fn snap(&mut self) {
        self.current = self.target;
        self.from = self.target;
        self.velocity = Vec3::ZERO;
    }

    fn ease(&mut self, progress: f32) {
        self.current = self.from.lerp(self.target, progress);
    }

    fn spring(&mut self, tension: f32, friction: f32, dt: f32) {
        let accel = (self.target - self.current) * tension - self.velocity * friction;
        self.velocity += accel * dt;
        self.current += self.velocity * dt;
    }
}

/// Wraps an angle delta into `(-π, π]`
fn shortest_delta(delta: f32) -> f32 {
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct AnimatedTransform {
    position: Channel,
    rotation: Channel,
    scale: Channel,
}

impl AnimatedTransform {
    fn at(transform: &Transform) -> Self {
        Self {
            position: Channel::at(transform.position),
            rotation: Channel::at(transform.rotation),
            scale: Channel::at(transform.scale.to_vec3()),
        }
    }

    fn retarget(&mut self, transform: &Transform) {
        self.position.retarget(transform.position);
        let current = self.rotation.current;
        let delta = transform.rotation - current;
        let rotation = current
            + Vec3::new(
                shortest_delta(delta.x),
                shortest_delta(delta.y),
                shortest_delta(delta.z),
            );
        self.rotation.retarget(rotation);
        self.scale.retarget(transform.scale.to_vec3());
    }

    fn channels(&mut self) -> [&mut Channel; 3] {
        [&mut self.position, &mut self.rotation, &mut self.scale]
    }

    fn at_rest(&self) -> bool {
        self.position.at_rest() && self.rotation.at_rest() && self.scale.at_rest()
    }

    fn current(&self) -> Transform {
        let s = self.scale.current;
        let scale = if s.x == s.y && s.y == s.z {
            Scale::Uniform(s.x)
        } else {
            Scale::NonUniform(s)
        };
        Transform {
            position: self.position.current,
            rotation: self.rotation.current,
            scale,
        }
    }
}

/// Per-frame interpolation of the group and item transforms.
///
/// The host retargets after every snapshot change and steps once per frame.
#[derive(Debug, Default)]
pub struct LayoutAnimator {
    config: AnimationConfig,
    group: AnimatedTransform,
    items: Vec<AnimatedTransform>,
    elapsed: f32,
    animating: bool,
}

impl LayoutAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Jump straight to a snapshot
    pub fn snap_to(&mut self, snapshot: &LayoutSnapshot) {
        self.config = snapshot.animation;
        self.group = AnimatedTransform::at(&snapshot.group);
        self.items = snapshot.items.iter().map(AnimatedTransform::at).collect();
        self.elapsed = 0.0;
        self.animating = false;
    }

    /// Start moving toward `snapshot`. A changed item count snaps instead.
    pub fn retarget(&mut self, snapshot: &LayoutSnapshot) -> Option<AnimationEvent> {
        if snapshot.items.len() != self.items.len() {
            let was_animating = self.animating;
            self.snap_to(snapshot);
            return was_animating.then_some(AnimationEvent::Settled);
        }

        self.config = snapshot.animation;
        self.elapsed = 0.0;
        self.group.retarget(&snapshot.group);
        for (animated, target) in self.items.iter_mut().zip(&snapshot.items) {
            animated.retarget(target);
        }

        let moving = !self.group.at_rest() || self.items.iter().any(|i| !i.at_rest());
        match (self.animating, moving) {
            (false, true) => {
                self.animating = true;
                trace!(items = self.items.len(), "Layout animation started");
                Some(AnimationEvent::Started)
            }
            // Retargeted onto where the items already are
            (true, false) => {
                self.for_each_channel(Channel::snap);
                self.animating = false;
                trace!("Layout animation settled on retarget");
                Some(AnimationEvent::Settled)
            }
            _ => None,
        }
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) -> Option<AnimationEvent> {
        if !self.animating {
            return None;
        }
        let dt = dt.max(0.0);

        let settled = match self.config {
            AnimationConfig::Timed { duration_ms, easing } => {
                self.elapsed += dt;
                let duration = duration_ms as f32 / 1000.0;
                let t = if duration > 0.0 { self.elapsed / duration } else { 1.0 };
                let progress = easing.apply(t);
                self.for_each_channel(|c| c.ease(progress));
                t >= 1.0
            }
            AnimationConfig::Spring { tension, friction } => {
                let mut remaining = dt;
                while remaining > 0.0 {
                    let h = remaining.min(SPRING_SUBSTEP);
                    self.for_each_channel(|c| c.spring(tension, friction, h));
                    remaining -= h;
                }
                self.group.at_rest() && self.items.iter().all(AnimatedTransform::at_rest)
            }
        };

        if settled {
            self.for_each_channel(Channel::snap);
            self.animating = false;
            trace!("Layout animation settled");
            return Some(AnimationEvent::Settled);
        }
        None
    }

    fn for_each_channel(&mut self, mut f: impl FnMut(&mut Channel)) {
        for channel in self.group.channels() {
            f(channel);
        }
        for item in &mut self.items {
            for channel in item.channels() {
                f(channel);
            }
        }
    }

    pub fn group_transform(&self) -> Transform {
        self.group.current()
    }

    pub fn item_transform(&self, index: usize) -> Option<Transform> {
        self.items.get(index).map(AnimatedTransform::current)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
