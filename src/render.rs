// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What a viewer hands to a renderer, and what it gets back.

use std::sync::atomic::AtomicBool;

/// One render call.  `view` is whatever the renderer needs to place
/// pixels in its world: a [`Viewport`](crate::Viewport) for the fractal,
/// a [`Camera`](crate::raytracer::Camera) for the ray caster.
#[derive(Debug)]
pub struct RenderRequest<'a, V> {
    /// Where the pixels are
    pub view: V,
    /// Echoed back in the result so the caller can drop stale frames
    pub request_no: u64,
    /// Set by the caller to ask workers to stop early
    pub cancel: &'a AtomicBool,
}

impl<'a, V> RenderRequest<'a, V> {
    /// Constructor.
    pub fn new(view: V, request_no: u64, cancel: &'a AtomicBool) -> Self {
        RenderRequest {
            view,
            request_no,
            cancel,
        }
    }
}

/// A finished Newton fractal.  Each pixel holds the index of the root
/// it converged to plus one, or zero if it converged to none.
#[derive(Clone, Debug, PartialEq)]
pub struct FractalResult {
    /// Root classes, row-major
    pub data: Vec<i16>,
    /// Number of distinct values `data` may hold: roots + 1
    pub classes: i16,
    /// The request this answers
    pub request_no: u64,
}

/// A finished ray-cast image, one buffer per channel, each value in
/// `0..=255`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorResult {
    /// Red channel, row-major
    pub red: Vec<i16>,
    /// Green channel, row-major
    pub green: Vec<i16>,
    /// Blue channel, row-major
    pub blue: Vec<i16>,
    /// The request this answers
    pub request_no: u64,
}
