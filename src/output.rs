// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning render results into something an image viewer can open.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::render::{ColorResult, FractalResult};

/// Pixels that converged to no root.
const UNCLASSIFIED: [u8; 3] = [0, 0, 0];

/// One fully saturated colour per root, spread evenly around the hue
/// circle.  `class` is 1-based; class 0 is black.
pub fn class_color(class: i16, classes: i16) -> [u8; 3] {
    let roots = f64::from(classes - 1);
    if class <= 0 || roots < 1.0 {
        return UNCLASSIFIED;
    }
    let hue = 6.0 * f64::from(class - 1) / roots;
    let fall = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, fall, 0.0),
        1 => (fall, 1.0, 0.0),
        2 => (0.0, 1.0, fall),
        3 => (0.0, fall, 1.0),
        4 => (fall, 0.0, 1.0),
        _ => (1.0, 0.0, fall),
    };
    let byte = |c: f64| num::clamp((c * 255.0).round(), 0.0, 255.0) as u8;
    [byte(r), byte(g), byte(b)]
}

/// Interleaved RGB bytes for a fractal, one palette entry per class.
pub fn fractal_to_rgb(result: &FractalResult) -> Vec<u8> {
    result
        .data
        .iter()
        .flat_map(|&class| class_color(class, result.classes).to_vec())
        .collect()
}

/// Interleaved RGB bytes for a ray-cast image.
pub fn channels_to_rgb(result: &ColorResult) -> Vec<u8> {
    let byte = |c: i16| num::clamp(c, 0, 255) as u8;
    result
        .red
        .iter()
        .zip(&result.green)
        .zip(&result.blue)
        .flat_map(|((&r, &g), &b)| vec![byte(r), byte(g), byte(b)])
        .collect()
}

/// Writes interleaved RGB bytes as a binary PPM.
pub fn write_image<P: AsRef<Path>>(path: P, pixels: &[u8], bounds: (usize, usize)) -> Result<()> {
    let output = File::create(path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn palette_separates_roots() {
        assert_eq!(class_color(0, 5), [0, 0, 0]);
        assert_eq!(class_color(1, 5), [255, 0, 0]);
        assert_eq!(class_color(2, 5), [128, 255, 0]);
        assert_eq!(class_color(3, 5), [0, 255, 255]);
        assert_eq!(class_color(4, 5), [128, 0, 255]);
        assert_eq!(class_color(1, 2), [255, 0, 0]);
        assert_eq!(class_color(1, 1), [0, 0, 0]);
    }

    #[test]
    fn channels_interleave() {
        let result = ColorResult {
            red: vec![1, 300],
            green: vec![2, -4],
            blue: vec![3, 255],
            request_no: 0,
        };
        assert_eq!(channels_to_rgb(&result), vec![1, 2, 3, 255, 0, 255]);
    }

    #[test]
    fn writes_a_binary_pixmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        let fractal = FractalResult {
            data: vec![0, 1, 2, 0, 1, 2],
            classes: 3,
            request_no: 0,
        };
        write_image(&path, &fractal_to_rgb(&fractal), (3, 2)).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&[0, 0, 0, 255, 0, 0, 0, 255, 255]));
    }
}
