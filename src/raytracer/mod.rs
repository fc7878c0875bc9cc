// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sphere ray caster
//!
//! For every pixel a ray leaves the eye through the screen, finds the
//! nearest sphere it hits, and lights that point with a single pass of
//! diffuse and specular illumination from every point light that can
//! see it.  Nothing is reflected or refracted further.

mod camera;
mod ray;
mod scene;
mod shading;
mod sphere;

pub use self::camera::Camera;
pub use self::ray::Ray;
pub use self::scene::{Intersectable, LightSource, Material, RayIntersection, Rgb, Scene, EPSILON};
pub use self::shading::{shade, AMBIENT};
pub use self::sphere::Sphere;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::info;

use crate::error::{Error, Result};
use crate::parallel::{Band, RgbPlanes, Strategy};
use crate::render::{ColorResult, RenderRequest};

/// Renders one fixed scene from whatever camera it is asked to.
#[derive(Debug)]
pub struct RayCaster {
    scene: Scene,
    strategy: Strategy,
}

impl RayCaster {
    /// Constructor.
    pub fn new(scene: Scene, strategy: Strategy) -> RayCaster {
        RayCaster { scene, strategy }
    }

    /// The scene being rendered.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn render_band(&self, camera: &Camera, first_row: usize, mut band: RgbPlanes, cancel: &AtomicBool) -> Result<()> {
        for row in 0..band.rows() {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            for x in 0..camera.width() {
                let ray = camera.primary_ray(x, first_row + row);
                band.set(row, x, shade(&self.scene, &ray));
            }
        }
        Ok(())
    }

    /// Shades every pixel of the request's camera, blocking until all
    /// workers are done.
    pub fn render(&self, request: &RenderRequest<Camera>) -> Result<ColorResult> {
        let camera = &request.view;
        let started = Instant::now();
        info!(request = request.request_no, width = camera.width(), height = camera.height(), "starting ray cast");

        let mut red = vec![0_i16; camera.len()];
        let mut green = vec![0_i16; camera.len()];
        let mut blue = vec![0_i16; camera.len()];
        self.strategy.run(
            RgbPlanes::new(camera.width(), &mut red, &mut green, &mut blue),
            request.cancel,
            |first_row, band| self.render_band(camera, first_row, band, request.cancel),
        )?;

        info!(request = request.request_no, elapsed = ?started.elapsed(), "ray cast finished");
        Ok(ColorResult {
            red,
            green,
            blue,
            request_no: request.request_no,
        })
    }

    /// Renders and hands the three channels to `observer`.  The observer
    /// is not called if the render fails or is cancelled.
    pub fn produce<F>(&self, request: &RenderRequest<Camera>, observer: F) -> Result<()>
    where
        F: FnOnce(ColorResult),
    {
        let result = self.render(request)?;
        observer(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Point3;

    fn scene() -> Scene {
        let shiny = Material {
            diffuse: Rgb::new(1.0, 0.3, 0.3),
            reflective: Rgb::new(0.5, 0.5, 0.5),
            shininess: 10.0,
        };
        Scene::new()
            .with_object(Sphere::new(Point3::new(0.0, 0.0, 0.0), 3.0, shiny))
            .with_object(Sphere::new(Point3::new(-5.0, 4.0, 2.0), 1.5, shiny))
            .with_light(LightSource {
                position: Point3::new(10.0, 5.0, 5.0),
                color: Rgb::new(200.0, 200.0, 200.0),
            })
            .with_light(LightSource {
                position: Point3::new(4.0, -6.0, 1.0),
                color: Rgb::new(60.0, 60.0, 120.0),
            })
    }

    fn camera(size: usize) -> Camera {
        Camera::new(
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 10.0),
            20.0,
            20.0,
            size,
            size,
        )
        .unwrap()
    }

    #[test]
    fn both_strategies_agree_bit_for_bit() {
        let cancel = AtomicBool::new(false);
        let request = RenderRequest::new(camera(45), 3, &cancel);
        let banded = RayCaster::new(scene(), Strategy::FixedBands { tasks: 7, workers: 3 })
            .render(&request)
            .unwrap();
        let split = RayCaster::new(scene(), Strategy::RecursiveSplit { threshold: 2, workers: 3 })
            .render(&request)
            .unwrap();
        assert_eq!(banded, split);
        assert_eq!(banded.request_no, 3);
    }

    #[test]
    fn centre_is_lit_and_corners_are_empty() {
        let cancel = AtomicBool::new(false);
        let result = RayCaster::new(scene(), Strategy::fixed_bands())
            .render(&RenderRequest::new(camera(21), 1, &cancel))
            .unwrap();
        let centre = 10 * 21 + 10;
        assert!(result.red[centre] > 15);
        for &corner in &[0, 20, 20 * 21, 21 * 21 - 1] {
            assert_eq!((result.red[corner], result.green[corner], result.blue[corner]), (0, 0, 0));
        }
        for channel in &[&result.red, &result.green, &result.blue] {
            assert!(channel.iter().all(|&c| c >= 0 && c <= 255));
        }
    }

    #[test]
    fn cancelled_cast_never_reaches_the_observer() {
        let cancel = AtomicBool::new(true);
        let mut called = false;
        let result = RayCaster::new(scene(), Strategy::recursive_split())
            .produce(&RenderRequest::new(camera(21), 9, &cancel), |_| called = true);
        match result {
            Err(Error::Cancelled) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(!called);
    }

    #[test]
    fn observer_receives_all_three_channels() {
        let cancel = AtomicBool::new(false);
        let mut seen = None;
        RayCaster::new(scene(), Strategy::fixed_bands())
            .produce(&RenderRequest::new(camera(9), 5, &cancel), |result| seen = Some(result))
            .unwrap();
        let seen = seen.unwrap();
        assert_eq!(seen.request_no, 5);
        assert_eq!((seen.red.len(), seen.green.len(), seen.blue.len()), (81, 81, 81));
    }
}
