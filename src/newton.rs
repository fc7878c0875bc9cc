// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Newton fractal renderer
//!
//! Newton's method finds a root of a polynomial by repeatedly sliding
//! down its tangent: `z ← z - P(z)/P'(z)`.  Started from a point on the
//! complex plane, the iteration usually settles onto one of the roots,
//! but which one depends on the start point in a wildly sensitive way
//! near the boundaries between basins.  Colouring each pixel by the
//! root its point settles onto draws those boundaries as a fractal.
//!
//! The renderer carries everything an individual pixel needs (the
//! polynomial, its derivative, its rooted form, and the thresholds) in
//! one immutable value that every worker borrows.

use itertools::iproduct;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use crate::complex::Complex;
use crate::error::{Error, Result};
use crate::parallel::{Band, Plane, Strategy};
use crate::planes::{Pixel, Viewport};
use crate::polynomial::{Polynomial, RootedPolynomial};
use crate::render::{FractalResult, RenderRequest};

/// Knobs for the per-pixel iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NewtonConfig {
    /// A step no longer than this counts as converged.
    pub convergence_threshold: f64,
    /// A converged point must lie strictly closer than this to a root
    /// to be classified as that root.
    pub root_threshold: f64,
    /// Iteration budget per pixel.
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        NewtonConfig {
            convergence_threshold: 1e-3,
            root_threshold: 3e-3,
            max_iterations: 16 * 16,
        }
    }
}

impl NewtonConfig {
    fn validate(&self) -> Result<()> {
        if !(self.convergence_threshold > 0.0) || !(self.root_threshold > 0.0) {
            return Err(Error::invalid("thresholds must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid("at least one iteration is required"));
        }
        Ok(())
    }
}

/// Where an iteration ended up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    /// The last point reached
    pub point: Complex,
    /// How many steps were taken
    pub iterations: usize,
    /// Whether the last step was within the convergence threshold
    pub converged: bool,
}

/// Renders Newton fractals for one fixed polynomial.
#[derive(Clone, Debug)]
pub struct NewtonRenderer {
    rooted: RootedPolynomial,
    polynomial: Polynomial,
    derivative: Polynomial,
    config: NewtonConfig,
    strategy: Strategy,
}

impl NewtonRenderer {
    /// Prepares the standard form and its derivative once, up front.
    /// The polynomial needs at least one root, and few enough that a
    /// class index still fits the output buffer.
    pub fn new(rooted: RootedPolynomial, config: NewtonConfig, strategy: Strategy) -> Result<Self> {
        if rooted.order() == 0 {
            return Err(Error::invalid("a Newton fractal needs at least one root"));
        }
        if rooted.order() >= i16::max_value() as usize {
            return Err(Error::invalid(format!("{} roots is too many to classify", rooted.order())));
        }
        config.validate()?;
        let polynomial = rooted.to_standard_form();
        let derivative = polynomial.derive();
        debug!(%rooted, %polynomial, %derivative, "prepared Newton polynomial");
        Ok(NewtonRenderer {
            rooted,
            polynomial,
            derivative,
            config,
            strategy,
        })
    }

    /// The polynomial in rooted form.
    pub fn rooted(&self) -> &RootedPolynomial {
        &self.rooted
    }

    /// The number of values a pixel can take: one per root, plus zero.
    pub fn classes(&self) -> i16 {
        self.rooted.order() as i16 + 1
    }

    /// Runs Newton's method from `start` until a step is no longer than
    /// the convergence threshold or the iteration budget is spent.  A
    /// step that is not a number (a zero derivative) also ends the
    /// iteration, and such a point never lies close to any root.
    pub fn iterate(&self, start: Complex) -> Orbit {
        let mut z = start;
        let mut iterations = 0;
        loop {
            let next = z - self.polynomial.evaluate(z) / self.derivative.evaluate(z);
            let step = (z - next).magnitude();
            z = next;
            iterations += 1;
            if !(step > self.config.convergence_threshold) {
                return Orbit {
                    point: z,
                    iterations,
                    converged: true,
                };
            }
            if iterations >= self.config.max_iterations {
                return Orbit {
                    point: z,
                    iterations,
                    converged: false,
                };
            }
        }
    }

    /// The index of the root that `start` converges to, if any.
    pub fn classify(&self, start: Complex) -> Option<usize> {
        let orbit = self.iterate(start);
        if !orbit.converged {
            return None;
        }
        self.rooted
            .index_of_closest_root(orbit.point, self.config.root_threshold)
    }

    fn render_band(&self, viewport: &Viewport, first_row: usize, mut band: Plane, cancel: &AtomicBool) -> Result<()> {
        let rows = first_row..first_row + band.rows();
        for ((y, x), pixel) in iproduct!(rows, 0..viewport.width()).zip(band.pixels_mut().iter_mut()) {
            if x == 0 && cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            let start = viewport.pixel_to_point(Pixel(x, y));
            *pixel = self.classify(start).map_or(0, |index| index as i16 + 1);
        }
        Ok(())
    }

    /// Classifies every pixel of the request's viewport, blocking until
    /// all workers are done.
    pub fn render(&self, request: &RenderRequest<Viewport>) -> Result<FractalResult> {
        let viewport = &request.view;
        let started = Instant::now();
        info!(request = request.request_no, width = viewport.width(), height = viewport.height(), "starting Newton render");

        let mut data = vec![0_i16; viewport.len()];
        self.strategy.run(
            Plane::new(viewport.width(), &mut data),
            request.cancel,
            |first_row, band| self.render_band(viewport, first_row, band, request.cancel),
        )?;

        info!(request = request.request_no, elapsed = ?started.elapsed(), "Newton render finished");
        Ok(FractalResult {
            data,
            classes: self.classes(),
            request_no: request.request_no,
        })
    }

    /// Renders and hands the finished buffer to `observer`.  The
    /// observer is not called if the render fails or is cancelled.
    pub fn produce<F>(&self, request: &RenderRequest<Viewport>, observer: F) -> Result<()>
    where
        F: FnOnce(FractalResult),
    {
        let result = self.render(request)?;
        observer(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unity_quartic() -> RootedPolynomial {
        RootedPolynomial::new(
            Complex::ONE,
            vec![Complex::ONE, Complex::ONE_NEG, Complex::IM, Complex::IM_NEG],
        )
    }

    fn renderer(strategy: Strategy) -> NewtonRenderer {
        NewtonRenderer::new(unity_quartic(), NewtonConfig::default(), strategy).unwrap()
    }

    #[test]
    fn a_root_converges_to_itself() {
        let newton = renderer(Strategy::fixed_bands());
        let orbit = newton.iterate(Complex::ONE);
        assert!(orbit.converged);
        assert!(orbit.iterations <= 2);
        assert_eq!(newton.classify(Complex::ONE), Some(0));
    }

    #[test]
    fn nearby_points_find_their_roots() {
        let newton = renderer(Strategy::fixed_bands());
        assert_eq!(newton.classify(Complex::new(0.9, 0.05)), Some(0));
        assert_eq!(newton.classify(Complex::new(-1.1, -0.05)), Some(1));
        assert_eq!(newton.classify(Complex::new(0.1, 0.8)), Some(2));
        assert_eq!(newton.classify(Complex::new(0.05, -1.2)), Some(3));
    }

    #[test]
    fn a_flat_tangent_classifies_as_none() {
        // P'(0) = 0 for z^4 - 1, so the first step is not a number.
        let newton = renderer(Strategy::fixed_bands());
        let orbit = newton.iterate(Complex::ZERO);
        assert_eq!(orbit.iterations, 1);
        assert_eq!(newton.classify(Complex::ZERO), None);
    }

    #[test]
    fn exhausting_the_budget_classifies_as_none() {
        let config = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let newton = NewtonRenderer::new(unity_quartic(), config, Strategy::fixed_bands()).unwrap();
        let orbit = newton.iterate(Complex::new(3.0, 3.0));
        assert!(!orbit.converged);
        assert_eq!(newton.classify(Complex::new(3.0, 3.0)), None);
    }

    #[test]
    fn rejects_bad_setup() {
        let empty = RootedPolynomial::new(Complex::ONE, vec![]);
        assert!(NewtonRenderer::new(empty, NewtonConfig::default(), Strategy::fixed_bands()).is_err());
        let config = NewtonConfig {
            root_threshold: 0.0,
            ..NewtonConfig::default()
        };
        assert!(NewtonRenderer::new(unity_quartic(), config, Strategy::fixed_bands()).is_err());
    }

    #[test]
    fn both_strategies_agree_bit_for_bit() {
        let viewport = Viewport::new(-2.0, 2.0, -1.5, 1.5, 64, 47).unwrap();
        let cancel = AtomicBool::new(false);
        let request = RenderRequest::new(viewport, 7, &cancel);

        let banded = renderer(Strategy::FixedBands { tasks: 9, workers: 3 }).render(&request).unwrap();
        let split = renderer(Strategy::RecursiveSplit { threshold: 3, workers: 3 }).render(&request).unwrap();
        assert_eq!(banded, split);
        assert_eq!(banded.classes, 5);
        assert_eq!(banded.request_no, 7);
        assert!(banded.data.iter().all(|&c| c >= 0 && c < 5));
    }

    #[test]
    fn rendered_pixels_match_single_point_classification() {
        let viewport = Viewport::new(-1.5, 1.5, -1.5, 1.5, 31, 31).unwrap();
        let cancel = AtomicBool::new(false);
        let newton = renderer(Strategy::fixed_bands());
        let result = newton.render(&RenderRequest::new(viewport, 1, &cancel)).unwrap();

        // The grid is centred, so pixel (30, 15) is 1.5 on the real axis
        // and pixel (15, 0) is 1.5i.
        assert_eq!(result.data[15 * 31 + 30], 1);
        assert_eq!(result.data[15 * 31], 2);
        assert_eq!(result.data[15], 3);
        assert_eq!(result.data[30 * 31 + 15], 4);
        assert_eq!(result.data[15 * 31 + 15], 0);
    }

    #[test]
    fn observer_receives_the_buffer() {
        let viewport = Viewport::new(-1.0, 1.0, -1.0, 1.0, 8, 8).unwrap();
        let cancel = AtomicBool::new(false);
        let mut seen = None;
        renderer(Strategy::recursive_split())
            .produce(&RenderRequest::new(viewport, 42, &cancel), |result| seen = Some(result))
            .unwrap();
        let seen = seen.unwrap();
        assert_eq!(seen.request_no, 42);
        assert_eq!(seen.data.len(), 64);
    }

    #[test]
    fn cancelled_render_never_reaches_the_observer() {
        let viewport = Viewport::new(-1.0, 1.0, -1.0, 1.0, 8, 8).unwrap();
        let cancel = AtomicBool::new(true);
        let mut called = false;
        let result = renderer(Strategy::fixed_bands())
            .produce(&RenderRequest::new(viewport, 1, &cancel), |_| called = true);
        assert!(result.is_err());
        assert!(!called);
    }
}
