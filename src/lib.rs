#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Newton fractal and ray-cast renderers
//!
//! Both renderers work the same way: every pixel is an independent
//! little numerical problem, so the image is cut into bands of rows and
//! the bands are handed out to every core available.
//!
//! The Newton fractal runs Newton's method from every point of a
//! window on the complex plane and colours the point by the root of a
//! polynomial that the iteration settles onto.  The ray caster sends a
//! ray from an eye through every pixel of a screen, finds the nearest
//! sphere it hits, and lights that spot with diffuse and specular light
//! from a handful of point lights.
//!
//! Two scheduling strategies are available to either renderer: a
//! fixed set of equal row bands pulled from a queue by a fixed crew of
//! threads, or recursive halving of the rows on a work-stealing pool.
//! They produce identical images.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod cli;
pub mod complex;
pub mod error;
pub mod newton;
pub mod output;
pub mod parallel;
pub mod planes;
pub mod polynomial;
pub mod raytracer;
pub mod render;
pub mod vector;

pub use complex::Complex;
pub use error::{Error, Result};
pub use newton::{NewtonConfig, NewtonRenderer};
pub use parallel::Strategy;
pub use planes::{Pixel, Viewport};
pub use polynomial::{Polynomial, RootedPolynomial};
pub use raytracer::RayCaster;
pub use render::{ColorResult, FractalResult, RenderRequest};
pub use vector::Point3;
