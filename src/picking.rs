//! Pointer picking: turning a click into a ray and testing it against the scene.
//!
//! - [`Ray`] — a 3D ray with origin and direction
//! - [`Collider`] — the pick shape attached to an entity
//! - [`RayHit`] — an intersection found by [`raycast`]
//!
//! Only entities that carry a [`Collider`] can be picked. In the scene that is
//! the sphere; lights and their targets never block or receive clicks.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::mesh::Transform;

/// Map a pointer position in viewport pixels to normalized device coordinates.
///
/// The top-left corner maps to `(-1, 1)` and the bottom-right to `(1, -1)`.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// A ray in 3D space.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Cast a ray through a point in normalized device coordinates.
    ///
    /// The ray starts on the near plane and points toward the far plane.
    pub fn from_ndc(ndc: Vec2, view_matrix: Mat4, projection_matrix: Mat4) -> Self {
        let near_clip = Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far_clip = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let inv_view_proj = (projection_matrix * view_matrix).inverse();

        let near_world = inv_view_proj * near_clip;
        let far_world = inv_view_proj * far_clip;

        // Perspective divide
        let near_point = near_world.truncate() / near_world.w;
        let far_point = far_world.truncate() / far_world.w;

        Self {
            origin: near_point,
            direction: (far_point - near_point).normalize_or_zero(),
        }
    }

    /// Cast a ray through a pointer position given in viewport pixels.
    pub fn from_screen(
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        view_matrix: Mat4,
        projection_matrix: Mat4,
    ) -> Self {
        let ndc = pointer_to_ndc(screen_x, screen_y, screen_width, screen_height);
        Self::from_ndc(ndc, view_matrix, projection_matrix)
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the nearest forward intersection with a
    /// sphere, or `None` if the ray misses it.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let a = self.direction.dot(self.direction);
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// The pick shape of an entity, centered on its transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Distance along `ray` to this collider placed at `position` with `scale`.
    pub fn intersect(&self, ray: &Ray, position: Vec3, scale: Vec3) -> Option<f32> {
        match self {
            Collider::Sphere { radius } => {
                let avg_scale = (scale.x + scale.y + scale.z) / 3.0;
                ray.intersect_sphere(position, radius * avg_scale)
            }
        }
    }
}

/// An intersection between a ray and a collider.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub entity: hecs::Entity,
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Cast a ray against every entity with a `Transform` and a `Collider`.
///
/// Returns the closest hit.
pub fn raycast(world: &hecs::World, ray: &Ray) -> Option<RayHit> {
    world
        .query::<(&Transform, &Collider)>()
        .iter()
        .filter_map(|(entity, (transform, collider))| {
            collider
                .intersect(ray, transform.position, transform.scale)
                .map(|distance| RayHit {
                    entity,
                    distance,
                    point: ray.point_at(distance),
                })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::default().at(0.0, 0.0, 4.5);
        camera.set_viewport(800.0, 600.0);
        camera
    }

    #[test]
    fn ndc_corners() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
        assert_eq!(
            pointer_to_ndc(800.0, 600.0, 800.0, 600.0),
            Vec2::new(1.0, -1.0)
        );
    }

    #[test]
    fn center_ray_points_down_the_view_axis() {
        let cam = camera();
        let ray = Ray::from_screen(
            400.0,
            300.0,
            800.0,
            600.0,
            cam.view_matrix(),
            cam.projection_matrix(),
        );
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin.z - 4.4).abs() < 1e-3);
    }

    #[test]
    fn center_ray_hits_unit_sphere() {
        let cam = camera();
        let ray = Ray::from_ndc(Vec2::ZERO, cam.view_matrix(), cam.projection_matrix());
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((ray.point_at(t).z - 1.0).abs() < 1e-3);
    }

    #[test]
    fn corner_ray_misses_unit_sphere() {
        let cam = camera();
        let ray = Ray::from_ndc(
            Vec2::new(-1.0, 1.0),
            cam.view_matrix(),
            cam.projection_matrix(),
        );
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn sphere_behind_ray_is_missed() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.intersect_sphere(Vec3::ZERO, 1.0), Some(1.0));
    }

    #[test]
    fn raycast_ignores_entities_without_collider() {
        let mut world = hecs::World::new();
        world.spawn((Transform::from_position(Vec3::new(0.0, 0.0, 2.0)),));
        let sphere = world.spawn((Transform::new(), Collider::sphere(1.0)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hit = raycast(&world, &ray).unwrap();
        assert_eq!(hit.entity, sphere);
        assert!((hit.distance - 9.0).abs() < 1e-5);
    }

    #[test]
    fn raycast_returns_closest() {
        let mut world = hecs::World::new();
        world.spawn((Transform::new(), Collider::sphere(1.0)));
        let near = world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
            Collider::sphere(1.0),
        ));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(raycast(&world, &ray).unwrap().entity, near);
    }
}
