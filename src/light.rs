//! Scene lights and the orbits the spotlights travel along.
//!
//! The ten spotlights are split into two concentric rings of five. Each light
//! is described by an immutable [`LightDescriptor`]; its position at any time
//! is a pure function of that descriptor and the elapsed time, so the same
//! inputs always give the same position.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::color::Color;

/// Spotlight colors, in light index order.
pub const LIGHT_COLORS: [u32; 10] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xff8800, 0x8800ff, 0x88ff00,
    0xff0088,
];

pub const LIGHTS_PER_RING: usize = 5;
/// Orbit radius of ring 0; each further ring adds [`RING_SPACING`].
pub const BASE_RADIUS: f32 = 100.0;
pub const RING_SPACING: f32 = 20.0;

/// Immutable description of one orbiting spotlight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightDescriptor {
    pub color: Color,
    /// Position of the light in the overall light list.
    pub index: usize,
    /// Ring the light orbits on (0 inner, 1 outer).
    pub ring: usize,
    /// Angle of the light's slot on its ring, in radians.
    pub base_angle: f32,
    pub radius: f32,
}

impl LightDescriptor {
    pub fn new(index: usize, color: Color) -> Self {
        let ring = index / LIGHTS_PER_RING;
        let slot = index % LIGHTS_PER_RING;
        Self {
            color,
            index,
            ring,
            base_angle: slot as f32 * (TAU / LIGHTS_PER_RING as f32),
            radius: BASE_RADIUS + ring as f32 * RING_SPACING,
        }
    }

    /// Where the light sits when the scene is first built.
    ///
    /// Outer rings are rotated by a tenth of a turn and lights are spread
    /// vertically along a double-frequency sine of their angle.
    pub fn initial_position(&self) -> Vec3 {
        let ring = self.ring as f32;
        let angle = self.base_angle + ring * PI / 10.0;
        let height = (angle * 2.0).sin() * (2.5 - ring * 0.4);
        Vec3::new(angle.cos() * self.radius, height, angle.sin() * self.radius)
    }

    /// Angular speed of the light around its ring, in radians per time unit.
    pub fn angular_speed(&self) -> f32 {
        0.5 + self.ring as f32 * 0.2
    }

    /// Amplitude of the light's vertical bobbing.
    pub fn bob_amplitude(&self) -> f32 {
        2.0 - self.ring as f32 * 0.3
    }

    /// Position of the light at animation time `time`.
    ///
    /// The angles are evaluated in `f64` so long-running animations keep
    /// moving smoothly; only the final position is narrowed to `f32`.
    pub fn position_at(&self, time: f64) -> Vec3 {
        let angle = self.base_angle as f64 + time * self.angular_speed() as f64;
        let y = (time * 0.3 + self.index as f64).sin() * self.bob_amplitude() as f64;
        let radius = self.radius as f64;
        Vec3::new(
            (angle.cos() * radius) as f32,
            y as f32,
            (angle.sin() * radius) as f32,
        )
    }
}

/// Build the descriptors of every spotlight in the scene.
pub fn orbit_descriptors() -> Vec<LightDescriptor> {
    LIGHT_COLORS
        .iter()
        .enumerate()
        .map(|(index, &hex)| LightDescriptor::new(index, Color::from_hex(hex)))
        .collect()
}

/// Uniform light applied equally to every surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

/// A cone light that orbits the scene and always aims at its target.
///
/// The light's position lives in its entity's [`Transform`](crate::Transform);
/// this component holds everything else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub descriptor: LightDescriptor,
    pub intensity: f32,
    /// Half-angle of the cone, in radians.
    pub angle: f32,
    /// Fraction of the cone that is attenuated toward the edge (0 = hard edge).
    pub penumbra: f32,
    /// Point the light is aimed at.
    pub target: Vec3,
    pub cast_shadow: bool,
}

impl SpotLight {
    pub fn new(descriptor: LightDescriptor, intensity: f32) -> Self {
        Self {
            descriptor,
            intensity,
            angle: PI / 3.0,
            penumbra: 0.0,
            target: Vec3::ZERO,
            cast_shadow: false,
        }
    }

    /// Unit vector from `position` toward the light's target.
    pub fn direction_from(&self, position: Vec3) -> Vec3 {
        (self.target - position).normalize_or(Vec3::NEG_Y)
    }

    /// Cosines of the outer and inner cone edges.
    ///
    /// The inner cosine is kept strictly above the outer one so the edge
    /// blend stays well defined for a hard-edged cone.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.cos();
        let inner = (self.angle * (1.0 - self.penumbra)).cos();
        (outer, inner.max(outer + 1e-4))
    }
}
