// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An immutable complex number.  Every operation hands back a new
//! value; nothing is normalized behind the caller's back, and equality
//! is exact, so anything that wants a tolerance has to supply it.
//!
//! The arithmetic is `num`'s.  What this wrapper adds is the checked
//! constructors, an angle in `[0, 2π)`, n-th roots, and a strict text
//! form in both directions.  Division by zero is not special-cased: it
//! yields infinities or NaN.

use num::complex::Complex64;
use num::traits::{One, Zero};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A point on the complex plane, treating the real part as the
/// x-component and the imaginary part as the y-component.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Complex(pub Complex64);

impl Complex {
    /// 0
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    /// 1
    pub const ONE: Complex = Complex::new(1.0, 0.0);
    /// -1
    pub const ONE_NEG: Complex = Complex::new(-1.0, 0.0);
    /// i
    pub const IM: Complex = Complex::new(0.0, 1.0);
    /// -i
    pub const IM_NEG: Complex = Complex::new(0.0, -1.0);

    /// Constructor.
    pub const fn new(re: f64, im: f64) -> Complex {
        Complex(Complex64::new(re, im))
    }

    /// A number on the real axis.
    pub fn from_real(re: f64) -> Complex {
        Complex::new(re, 0.0)
    }

    /// A number on the imaginary axis.
    pub fn from_imaginary(im: f64) -> Complex {
        Complex::new(0.0, im)
    }

    /// Real part
    pub fn re(&self) -> f64 {
        self.0.re
    }

    /// Imaginary part
    pub fn im(&self) -> f64 {
        self.0.im
    }

    /// Builds a number from its polar form.  A negative magnitude has
    /// no meaning and is rejected.
    pub fn from_polar(magnitude: f64, angle: f64) -> Result<Complex> {
        if magnitude < 0.0 {
            return Err(Error::invalid(format!(
                "magnitude must not be negative, got {}",
                magnitude
            )));
        }
        Ok(Complex(Complex64::from_polar(&magnitude, &angle)))
    }

    /// Distance from the origin.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// The principal argument, in `[0, 2π)`.  The angle of zero is zero.
    pub fn angle(&self) -> f64 {
        let angle = self.0.arg();
        if angle < 0.0 {
            angle + 2.0 * PI
        } else {
            angle
        }
    }

    /// Raises this number to a non-negative integral power.
    pub fn powi(&self, n: i32) -> Result<Complex> {
        if n < 0 {
            return Err(Error::invalid(format!(
                "power must not be negative, got {}",
                n
            )));
        }
        Ok(Complex(self.0.powi(n)))
    }

    /// All `n` of the n-th roots, walking counter-clockwise from the
    /// principal one.
    pub fn roots(&self, n: u32) -> Result<Vec<Complex>> {
        if n == 0 {
            return Err(Error::invalid("root order must be positive"));
        }
        let magnitude = self.magnitude().powf(1.0 / f64::from(n));
        let angle = self.angle();
        (0..n)
            .map(|k| {
                let theta = (angle + 2.0 * PI * f64::from(k)) / f64::from(n);
                Complex::from_polar(magnitude, theta)
            })
            .collect()
    }
}

impl From<Complex64> for Complex {
    fn from(z: Complex64) -> Complex {
        Complex(z)
    }
}

impl From<Complex> for Complex64 {
    fn from(z: Complex) -> Complex64 {
        z.0
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Complex {
            type Output = Complex;
            #[inline]
            fn $method(self, other: Complex) -> Complex {
                Complex(self.0.$method(other.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
forward_binop!(Div, div);

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex(-self.0)
    }
}

impl Zero for Complex {
    fn zero() -> Complex {
        Complex::ZERO
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Complex {
    fn one() -> Complex {
        Complex::ONE
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (re, im) = (self.0.re, self.0.im);
        if im == 0.0 {
            write!(f, "{}", re)
        } else if re == 0.0 {
            write!(f, "{}i", im)
        } else if im > 0.0 {
            write!(f, "{}+{}i", re, im)
        } else {
            write!(f, "{}{}i", re, im)
        }
    }
}

/// Only plain decimal notation, so that words like "inf" never sneak
/// through `f64::from_str`.
fn parse_real(s: &str) -> Option<f64> {
    if s.is_empty()
        || !s
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-')
    {
        return None;
    }
    f64::from_str(s).ok()
}

fn parse_imaginary(s: &str) -> Option<f64> {
    match s.strip_suffix('i')? {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        coefficient => parse_real(coefficient),
    }
}

/// Accepts `a`, `bi`, `i`, and `a±bi` with optional leading signs and
/// any amount of whitespace, e.g. `"-1 - i"` or `"+2.5e-1+3i"`.
impl FromStr for Complex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Complex> {
        let malformed = || Error::MalformedComplex {
            input: s.to_string(),
        };
        let text: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = text.as_bytes();

        // The sign separating the two terms: not the leading one, and
        // not the sign of an exponent.
        let split = (1..bytes.len()).rev().find(|&i| {
            (bytes[i] == b'+' || bytes[i] == b'-') && bytes[i - 1] != b'e' && bytes[i - 1] != b'E'
        });

        match split {
            Some(index) => {
                let re = parse_real(&text[..index]).ok_or_else(malformed)?;
                let im = parse_imaginary(&text[index..]).ok_or_else(malformed)?;
                Ok(Complex::new(re, im))
            }
            None if text.ends_with('i') => parse_imaginary(&text)
                .map(Complex::from_imaginary)
                .ok_or_else(malformed),
            None => parse_real(&text)
                .map(Complex::from_real)
                .ok_or_else(malformed),
        }
    }
}
