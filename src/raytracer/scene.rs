// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What a scene is made of: objects a ray can hit, the material at the
//! point it hits them, and the lights that illuminate that point.

use std::fmt;
use std::ops::{Add, Mul};

use super::ray::Ray;
use crate::vector::Point3;

/// Distances closer than this are the same distance.
pub const EPSILON: f64 = 1e-9;

/// A colour or a per-channel coefficient.  Light colours are
/// intensities on the 0-255 scale; material coefficients are fractions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rgb {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl Rgb {
    /// Constructor.
    pub const fn new(r: f64, g: f64, b: f64) -> Rgb {
        Rgb { r, g, b }
    }

    /// Rounds each channel to the nearest integer and clamps it into
    /// `0..=255`.
    pub fn to_pixel(self) -> [i16; 3] {
        let channel = |c: f64| num::clamp(c.round(), 0.0, 255.0) as i16;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, o: Rgb) -> Rgb {
        Rgb::new(self.r + o.r, self.g + o.g, self.b + o.b)
    }
}

impl Mul for Rgb {
    type Output = Rgb;
    fn mul(self, o: Rgb) -> Rgb {
        Rgb::new(self.r * o.r, self.g * o.g, self.b * o.b)
    }
}

impl Mul<f64> for Rgb {
    type Output = Rgb;
    fn mul(self, s: f64) -> Rgb {
        Rgb::new(self.r * s, self.g * s, self.b * s)
    }
}

/// How a surface responds to light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse reflection coefficient per channel
    pub diffuse: Rgb,
    /// Specular reflection coefficient per channel
    pub reflective: Rgb,
    /// Specular exponent; higher is glossier
    pub shininess: f64,
}

/// Where a ray met an object.  Made fresh for each query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayIntersection<'a> {
    /// The point of contact
    pub point: Point3,
    /// Signed distance along the ray; negative means behind the origin
    pub distance: f64,
    /// Whether the ray arrived from outside the object
    pub outer: bool,
    /// Outward unit normal at `point`
    pub normal: Point3,
    /// The surface that was hit
    pub material: &'a Material,
}

/// Anything a ray can hit.
pub trait Intersectable: fmt::Debug + Send + Sync {
    /// The intersection nearest the ray's origin, or `None` if the ray
    /// misses entirely.  The distance may be negative when the object
    /// lies behind the ray.
    fn find_closest_intersection(&self, ray: &Ray) -> Option<RayIntersection>;
}

/// A point light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightSource {
    /// Where the light sits
    pub position: Point3,
    /// Its intensity per channel, 0-255
    pub color: Rgb,
}

/// Objects and lights.  Read-only for the whole of a render.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Box<dyn Intersectable>>,
    lights: Vec<LightSource>,
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Scene {
        Scene::default()
    }

    /// Adds an object.
    pub fn with_object<T: Intersectable + 'static>(mut self, object: T) -> Scene {
        self.objects.push(Box::new(object));
        self
    }

    /// Adds a light.
    pub fn with_light(mut self, light: LightSource) -> Scene {
        self.lights.push(light);
        self
    }

    /// Every object.
    pub fn objects(&self) -> &[Box<dyn Intersectable>] {
        &self.objects
    }

    /// Every light.
    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    /// The nearest hit in front of the ray's origin.  When two objects
    /// are hit at the same distance the one added first wins.
    pub fn closest_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let mut closest: Option<RayIntersection> = None;
        for object in &self.objects {
            if let Some(hit) = object.find_closest_intersection(ray) {
                if hit.distance >= 0.0
                    && closest
                        .as_ref()
                        .map_or(true, |best| hit.distance + EPSILON < best.distance)
                {
                    closest = Some(hit);
                }
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::sphere::Sphere;

    fn material(shininess: f64) -> Material {
        Material {
            diffuse: Rgb::new(1.0, 1.0, 1.0),
            reflective: Rgb::new(0.5, 0.5, 0.5),
            shininess,
        }
    }

    fn along_x() -> Ray {
        Ray::from_points(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn coincident_objects_keep_the_first_added() {
        let scene = Scene::new()
            .with_object(Sphere::new(Point3::new(5.0, 0.0, 0.0), 1.0, material(1.0)))
            .with_object(Sphere::new(Point3::new(5.0, 0.0, 0.0), 1.0, material(2.0)))
            .with_object(Sphere::new(Point3::new(5.0 - 1e-12, 0.0, 0.0), 1.0, material(3.0)));
        let hit = scene.closest_intersection(&along_x()).unwrap();
        assert_eq!(hit.material.shininess, 1.0);
        assert!((hit.distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn a_clearly_nearer_later_object_wins() {
        let scene = Scene::new()
            .with_object(Sphere::new(Point3::new(9.0, 0.0, 0.0), 1.0, material(1.0)))
            .with_object(Sphere::new(Point3::new(5.0, 0.0, 0.0), 1.0, material(2.0)));
        let hit = scene.closest_intersection(&along_x()).unwrap();
        assert_eq!(hit.material.shininess, 2.0);
    }

    #[test]
    fn objects_behind_the_ray_are_skipped() {
        let scene = Scene::new()
            .with_object(Sphere::new(Point3::new(-10.0, 0.0, 0.0), 1.0, material(1.0)))
            .with_object(Sphere::new(Point3::new(5.0, 0.0, 0.0), 1.0, material(2.0)));
        let hit = scene.closest_intersection(&along_x()).unwrap();
        assert_eq!(hit.material.shininess, 2.0);
        assert!((hit.distance - 4.0).abs() < 1e-9);

        let behind_only = Scene::new().with_object(Sphere::new(Point3::new(-10.0, 0.0, 0.0), 1.0, material(1.0)));
        assert!(behind_only.closest_intersection(&along_x()).is_none());
        assert!(Scene::new().closest_intersection(&along_x()).is_none());
    }

    #[test]
    fn colours_round_once_then_clamp() {
        assert_eq!(Rgb::new(0.4, 254.6, 300.0).to_pixel(), [0, 255, 255]);
        assert_eq!(Rgb::new(-3.0, 10.5, 99.49).to_pixel(), [0, 11, 99]);
        let mixed = (Rgb::new(10.0, 20.0, 30.0) + Rgb::new(1.0, 2.0, 3.0)) * Rgb::new(0.5, 0.5, 0.5) * 2.0;
        assert_eq!(mixed, Rgb::new(11.0, 22.0, 33.0));
    }
}
