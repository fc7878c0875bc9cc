// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! its upper-left corner, and a rectangle on the complex plane bounded
//! by its real and imaginary extents.

use crate::complex::Complex;
use crate::error::{Error, Result};

/// Describes the x, y of a pixel on the integral plane.  Row 0 is the
/// top of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The window of the complex plane being rendered, and the size of the
/// pixel grid it is rendered onto.  The corners of the grid land
/// exactly on the corners of the window, so pixel `(0, 0)` is
/// `re_min + im_max·i` and pixel `(width-1, height-1)` is
/// `re_max + im_min·i`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    re_min: f64,
    re_max: f64,
    im_min: f64,
    im_max: f64,
    width: usize,
    height: usize,
}

impl Viewport {
    /// Constructor.  The window must have positive extent on both axes
    /// and the grid must be at least two pixels on each side, since the
    /// mapping divides by `width - 1` and `height - 1`.
    pub fn new(
        re_min: f64,
        re_max: f64,
        im_min: f64,
        im_max: f64,
        width: usize,
        height: usize,
    ) -> Result<Viewport> {
        if !(re_max > re_min) {
            return Err(Error::InvalidViewport {
                reason: format!("real range {}..{} is empty", re_min, re_max),
            });
        }
        if !(im_max > im_min) {
            return Err(Error::InvalidViewport {
                reason: format!("imaginary range {}..{} is empty", im_min, im_max),
            });
        }
        if width < 2 || height < 2 {
            return Err(Error::InvalidViewport {
                reason: format!("{}x{} is smaller than 2x2 pixels", width, height),
            });
        }
        Ok(Viewport {
            re_min,
            re_max,
            im_min,
            im_max,
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

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Given a pixel on the integral plane, map it to the matching
    /// point on the complex plane.  The vertical axis is flipped.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex {
        let Pixel(x, y) = pixel;
        Complex::new(
            (x as f64) * (self.re_max - self.re_min) / ((self.width - 1) as f64) + self.re_min,
            ((self.height - 1 - y) as f64) * (self.im_max - self.im_min) / ((self.height - 1) as f64)
                + self.im_min,
        )
    }
}
