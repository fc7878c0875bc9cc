// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::ray::Ray;
use crate::error::{Error, Result};
use crate::vector::Point3;

/// An eye looking through a rectangular screen.  The screen is centred
/// on `view`, perpendicular to the line of sight, `horizontal` by
/// `vertical` world units in size, and divided into `width` by
/// `height` pixels whose corners land exactly on the screen's corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    eye: Point3,
    corner: Point3,
    x_axis: Point3,
    y_axis: Point3,
    horizontal: f64,
    vertical: f64,
    width: usize,
    height: usize,
}

impl Camera {
    /// Builds the screen's basis.  `view_up` only needs to be roughly
    /// up; its component along the line of sight is discarded.
    pub fn new(
        eye: Point3,
        view: Point3,
        view_up: Point3,
        horizontal: f64,
        vertical: f64,
        width: usize,
        height: usize,
    ) -> Result<Camera> {
        if width < 2 || height < 2 {
            return Err(Error::InvalidViewport {
                reason: format!("{}x{} is smaller than 2x2 pixels", width, height),
            });
        }
        if !(horizontal > 0.0) || !(vertical > 0.0) {
            return Err(Error::InvalidViewport {
                reason: format!("screen of {} by {} has no area", horizontal, vertical),
            });
        }

        let sight = (view - eye).normalized();
        let up = view_up.normalized();
        let y_axis = (up - sight * up.dot(sight)).normalized();
        let x_axis = sight.cross(y_axis).normalized();
        if !x_axis.norm().is_finite() || !y_axis.norm().is_finite() {
            return Err(Error::InvalidViewport {
                reason: "eye, view and up do not span a screen".to_string(),
            });
        }

        let corner = view - x_axis * (horizontal / 2.0) + y_axis * (vertical / 2.0);
        Ok(Camera {
            eye,
            corner,
            x_axis,
            y_axis,
            horizontal,
            vertical,
            width,
            height,
        })
    }

    /// Width of the pixel grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the pixel grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Where pixel `(x, y)` sits on the screen; row 0 is the top.
    pub fn screen_point(&self, x: usize, y: usize) -> Point3 {
        self.corner + self.x_axis * (self.horizontal * x as f64 / (self.width - 1) as f64)
            - self.y_axis * (self.vertical * y as f64 / (self.height - 1) as f64)
    }

    /// The ray from the eye through pixel `(x, y)`.
    pub fn primary_ray(&self, x: usize, y: usize) -> Ray {
        Ray::from_points(self.eye, self.screen_point(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 10.0),
            20.0,
            20.0,
            21,
            21,
        )
        .unwrap()
    }

    #[test]
    fn screen_spans_the_view() {
        let camera = camera();
        assert_eq!(camera.screen_point(0, 0), Point3::new(0.0, -10.0, 10.0));
        assert_eq!(camera.screen_point(20, 20), Point3::new(0.0, 10.0, -10.0));
        assert_eq!(camera.screen_point(10, 10), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(camera.primary_ray(10, 10).direction, Point3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_degenerate_setups() {
        let origin = Point3::new(0.0, 0.0, 0.0);
        let up = Point3::new(0.0, 0.0, 1.0);
        let eye = Point3::new(10.0, 0.0, 0.0);
        assert!(Camera::new(eye, origin, up, 20.0, 20.0, 1, 20).is_err());
        assert!(Camera::new(eye, origin, up, 0.0, 20.0, 20, 20).is_err());
        assert!(Camera::new(origin, origin, up, 20.0, 20.0, 20, 20).is_err());
        assert!(Camera::new(Point3::new(0.0, 0.0, 10.0), origin, up, 20.0, 20.0, 20, 20).is_err());
    }
}
