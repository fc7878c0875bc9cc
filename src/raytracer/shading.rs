// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Local illumination: one pass of diffuse and specular light per
//! light source, no recursion.

use super::ray::Ray;
use super::scene::{Rgb, Scene, EPSILON};

/// What every visible surface gets before any light reaches it.
pub const AMBIENT: Rgb = Rgb::new(15.0, 15.0, 15.0);

/// The colour seen along `ray`: black if it hits nothing, otherwise the
/// ambient term plus the contribution of every light that can see the
/// hit point.
pub fn shade(scene: &Scene, ray: &Ray) -> [i16; 3] {
    let hit = match scene.closest_intersection(ray) {
        Some(hit) => hit,
        None => return [0, 0, 0],
    };

    let mut color = AMBIENT;
    for light in scene.lights() {
        let to_light = light.position - hit.point;
        let distance = to_light.norm();
        // A light sitting on the surface has no direction to shine from.
        if !(distance > EPSILON) {
            continue;
        }

        // Something between the light and the hit point casts a shadow.
        let light_ray = Ray::from_points(light.position, hit.point);
        if let Some(blocker) = scene.closest_intersection(&light_ray) {
            if distance - blocker.distance > EPSILON {
                continue;
            }
        }

        let l = to_light.normalized();
        let n = hit.normal;
        let diffuse = l.dot(n).max(0.0);
        color = color + light.color * hit.material.diffuse * diffuse;

        let reflected = n * (2.0 * n.dot(l)) - l;
        let v = (ray.origin - hit.point).normalized();
        let specular = reflected.dot(v).max(0.0).powf(hit.material.shininess);
        color = color + light.color * hit.material.reflective * specular;
    }
    color.to_pixel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::scene::{LightSource, Material};
    use crate::raytracer::sphere::Sphere;
    use crate::vector::Point3;

    fn origin() -> Point3 {
        Point3::new(0.0, 0.0, 0.0)
    }

    fn matte() -> Material {
        Material {
            diffuse: Rgb::new(0.4, 0.2, 0.0),
            reflective: Rgb::new(0.2, 0.2, 0.2),
            shininess: 3.0,
        }
    }

    fn white_light(position: Point3) -> LightSource {
        LightSource {
            position,
            color: Rgb::new(255.0, 255.0, 255.0),
        }
    }

    #[test]
    fn a_miss_is_black() {
        let scene = Scene::new().with_object(Sphere::new(origin(), 1.0, matte()));
        let ray = Ray::from_points(Point3::new(10.0, 5.0, 0.0), Point3::new(0.0, 5.0, 0.0));
        assert_eq!(shade(&scene, &ray), [0, 0, 0]);
        assert_eq!(shade(&Scene::new(), &ray), [0, 0, 0]);
    }

    #[test]
    fn an_unlit_hit_is_ambient() {
        let scene = Scene::new().with_object(Sphere::new(origin(), 1.0, matte()));
        let ray = Ray::from_points(Point3::new(10.0, 0.0, 0.0), origin());
        assert_eq!(shade(&scene, &ray), [15, 15, 15]);
    }

    #[test]
    fn head_on_light_adds_full_diffuse_and_specular() {
        let scene = Scene::new()
            .with_object(Sphere::new(origin(), 1.0, matte()))
            .with_light(white_light(Point3::new(10.0, 0.0, 0.0)));
        let ray = Ray::from_points(Point3::new(10.0, 0.0, 0.0), origin());
        assert_eq!(shade(&scene, &ray), [168, 117, 66]);
    }

    #[test]
    fn light_behind_the_surface_adds_nothing() {
        let scene = Scene::new()
            .with_object(Sphere::new(origin(), 1.0, matte()))
            .with_light(white_light(Point3::new(-10.0, 0.0, 0.0)));
        let ray = Ray::from_points(Point3::new(10.0, 0.0, 0.0), origin());
        assert_eq!(shade(&scene, &ray), [15, 15, 15]);
    }

    #[test]
    fn an_object_between_light_and_surface_casts_a_shadow() {
        let eye = Point3::new(5.0, 5.0, 0.0);
        let light = white_light(Point3::new(10.0, 0.0, 0.0));
        let ray = Ray::from_points(eye, origin());

        let lit = Scene::new()
            .with_object(Sphere::new(origin(), 1.0, matte()))
            .with_light(light);
        let [red, _, _] = shade(&lit, &ray);
        assert!(red > 15);

        let shadowed = Scene::new()
            .with_object(Sphere::new(origin(), 1.0, matte()))
            .with_object(Sphere::new(Point3::new(5.0, 0.3, 0.0), 0.5, matte()))
            .with_light(light);
        assert_eq!(shade(&shadowed, &ray), [15, 15, 15]);
    }

    #[test]
    fn bright_lights_clamp_at_255() {
        let scene = Scene::new()
            .with_object(Sphere::new(origin(), 1.0, matte()))
            .with_light(white_light(Point3::new(10.0, 0.0, 0.0)))
            .with_light(white_light(Point3::new(10.0, 0.0, 0.0)));
        let ray = Ray::from_points(Point3::new(10.0, 0.0, 0.0), origin());
        assert_eq!(shade(&scene, &ray), [255, 219, 117]);
    }
}
