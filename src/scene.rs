//! The scene graph: camera, sphere, ambient light and orbiting spotlights.
//!
//! Entities live in a [`hecs::World`]. The sphere carries a mesh shape, a
//! material and a [`Collider`]; lights carry an [`AmbientLight`] or a
//! [`Transform`] plus [`SpotLight`]. The camera sits beside the world since
//! there is exactly one.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::info;

use crate::camera::{DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR, PerspectiveCamera};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::light::{AmbientLight, SpotLight, orbit_descriptors};
use crate::mesh::{SphereShape, Transform};
use crate::picking::{Collider, Ray, RayHit, raycast};
use crate::surface::Viewport;

/// Distance of the camera from the sphere before the zoom.
pub const CAMERA_DISTANCE: f32 = 4.5;
pub const SPHERE_RADIUS: f32 = 1.0;
pub const SPHERE_SEGMENTS: u32 = 128;
pub const AMBIENT_INTENSITY: f32 = 0.2;
pub const SPOT_INTENSITY: f32 = 1.0;

/// Physically based surface description of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Color,
    /// Render back faces as well as front faces.
    pub double_sided: bool,
}

impl StandardMaterial {
    /// Light grey, mostly rough, non-metallic with a faint glow.
    pub fn matte() -> Self {
        Self {
            color: Color::from_hex(0xdddddd),
            roughness: 0.7,
            metalness: 0.0,
            emissive: Color::from_hex(0x111111),
            double_sided: true,
        }
    }
}

/// A spotlight as seen by the renderer.
#[derive(Clone, Copy, Debug)]
pub struct SpotLightView {
    pub position: Vec3,
    pub light: SpotLight,
}

/// The whole scene: entity world, camera and background.
pub struct Scene {
    pub world: World,
    pub camera: PerspectiveCamera,
    pub background: Color,
    sphere: Entity,
    lights: Vec<Entity>,
}

impl Scene {
    /// Build the scene for a viewport.
    pub fn build(viewport: Viewport) -> Self {
        let mut world = World::new();

        let camera = PerspectiveCamera::new(DEFAULT_FOV, viewport.aspect(), DEFAULT_NEAR, DEFAULT_FAR)
            .at(0.0, 0.0, CAMERA_DISTANCE);

        let sphere = world.spawn((
            Transform::new(),
            SphereShape::new(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            StandardMaterial::matte(),
            Collider::sphere(SPHERE_RADIUS),
        ));

        world.spawn((AmbientLight::new(Color::WHITE, AMBIENT_INTENSITY),));

        let lights = orbit_descriptors()
            .into_iter()
            .map(|descriptor| {
                world.spawn((
                    Transform::from_position(descriptor.initial_position()),
                    SpotLight::new(descriptor, SPOT_INTENSITY),
                ))
            })
            .collect::<Vec<_>>();

        info!(lights = lights.len(), "scene initialized");

        Self {
            world,
            camera,
            background: Color::BLACK,
            sphere,
            lights,
        }
    }

    pub fn sphere_entity(&self) -> Entity {
        self.sphere
    }

    pub fn light_entities(&self) -> &[Entity] {
        &self.lights
    }

    /// Transform, shape and material of the sphere.
    pub fn sphere_parts(&self) -> Option<(Transform, SphereShape, StandardMaterial)> {
        let mut query = self
            .world
            .query_one::<(&Transform, &SphereShape, &StandardMaterial)>(self.sphere)
            .ok()?;
        query.get().map(|(t, s, m)| (*t, *s, *m))
    }

    /// Shape of the sphere mesh the renderer uploads.
    pub fn sphere_shape(&self) -> Result<SphereShape> {
        self.sphere_parts()
            .map(|(_, shape, _)| shape)
            .ok_or(Error::MissingSphere)
    }

    /// Move every spotlight to its orbit position at animation time `time`.
    pub fn update_lights(&mut self, time: f64) {
        for (_, (transform, light)) in self.world.query_mut::<(&mut Transform, &SpotLight)>() {
            transform.position = light.descriptor.position_at(time);
        }
    }

    /// Spotlights ordered by light index.
    pub fn spot_lights(&self) -> Vec<SpotLightView> {
        let mut lights: Vec<_> = self
            .world
            .query::<(&Transform, &SpotLight)>()
            .iter()
            .map(|(_, (transform, light))| SpotLightView {
                position: transform.position,
                light: *light,
            })
            .collect();
        lights.sort_by_key(|view| view.light.descriptor.index);
        lights
    }

    /// Combined ambient light, in linear color scaled by intensity.
    pub fn ambient(&self) -> [f32; 3] {
        self.world
            .query::<&AmbientLight>()
            .iter()
            .map(|(_, light)| light.color.scaled_linear(light.intensity))
            .fold([0.0; 3], |acc, c| [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]])
    }

    /// Cast a ray through a viewport pixel and return the pickable entity it hits.
    pub fn pick(&self, x: f32, y: f32, viewport: Viewport) -> Option<RayHit> {
        let ray = Ray::from_screen(
            x,
            y,
            viewport.width,
            viewport.height,
            self.camera.view_matrix(),
            self.camera.projection_matrix(),
        );
        raycast(&self.world, &ray)
    }
}
