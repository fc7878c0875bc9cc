// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::ray::Ray;
use super::scene::{Intersectable, Material, RayIntersection, EPSILON};
use crate::vector::Point3;

/// A solid ball.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Material,
}

impl Sphere {
    /// Constructor.
    pub fn new(center: Point3, radius: f64, material: Material) -> Sphere {
        Sphere {
            center,
            radius,
            material,
        }
    }

    /// Centre of the ball.
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Radius of the ball.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn hit_at(&self, ray: &Ray, distance: f64, outer: bool) -> RayIntersection {
        let point = ray.at(distance);
        RayIntersection {
            point,
            distance,
            outer,
            normal: (point - self.center).normalized(),
            material: &self.material,
        }
    }
}

impl Intersectable for Sphere {
    /// Solves `|o + t·d - c|² = r²` for `t`.  With `a = d·(o - c)` the
    /// roots are `-a ± √(a² + r² - |o - c|²)`.  Both roots on the same
    /// side of the origin means the origin is outside the ball; the
    /// nearer root in front of the origin is the one reported.
    fn find_closest_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let offset = ray.origin - self.center;
        let a = ray.direction.dot(offset);
        let disc = a * a + self.radius * self.radius - offset.dot(offset);

        if disc < -EPSILON {
            return None;
        }
        if disc <= EPSILON {
            return Some(self.hit_at(ray, -a, true));
        }

        let root = disc.sqrt();
        let (near, far) = (-a - root, -a + root);
        let outer = near.signum() == far.signum();
        let distance = if near < 0.0 { far } else { near };
        Some(self.hit_at(ray, distance, outer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::scene::Rgb;

    fn unit_sphere() -> Sphere {
        Sphere::new(
            Point3::new(0.0, 0.0, 0.0),
            1.0,
            Material {
                diffuse: Rgb::new(1.0, 1.0, 1.0),
                reflective: Rgb::new(0.5, 0.5, 0.5),
                shininess: 10.0,
            },
        )
    }

    #[test]
    fn hits_from_outside() {
        let sphere = unit_sphere();
        let ray = Ray::from_points(Point3::new(10.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0));
        let hit = sphere.find_closest_intersection(&ray).unwrap();
        assert_eq!(hit.distance, 9.0);
        assert!(hit.outer);
        assert_eq!(hit.point, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(hit.normal, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn hits_from_inside() {
        let sphere = unit_sphere();
        let ray = Ray::from_points(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 5.0, 0.0));
        let hit = sphere.find_closest_intersection(&ray).unwrap();
        assert_eq!(hit.distance, 1.0);
        assert!(!hit.outer);
    }

    #[test]
    fn grazes_at_a_tangent() {
        let sphere = unit_sphere();
        let ray = Ray::from_points(Point3::new(10.0, 1.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let hit = sphere.find_closest_intersection(&ray).unwrap();
        assert_eq!(hit.distance, 10.0);
        assert!(hit.outer);
    }

    #[test]
    fn behind_the_origin_is_negative() {
        let sphere = unit_sphere();
        let ray = Ray::from_points(Point3::new(10.0, 0.0, 0.0), Point3::new(20.0, 0.0, 0.0));
        let hit = sphere.find_closest_intersection(&ray).unwrap();
        assert_eq!(hit.distance, -9.0);
        assert!(hit.outer);
    }

    #[test]
    fn misses() {
        let sphere = unit_sphere();
        let ray = Ray::from_points(Point3::new(10.0, 2.0, 0.0), Point3::new(0.0, 2.0, 0.0));
        assert!(sphere.find_closest_intersection(&ray).is_none());
    }
}
