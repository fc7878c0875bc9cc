// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Polynomials with complex coefficients, in both of the forms the
//! Newton renderer needs: the standard form, which can be evaluated and
//! differentiated cheaply, and the rooted form, which knows which root
//! a converged point belongs to.

use num::traits::Zero;
use std::fmt;

use crate::complex::Complex;

/// A polynomial in standard form.  The coefficient at index `i` belongs
/// to `z^i`, so index 0 is the constant term.  The empty polynomial is
/// the zero polynomial.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<Complex>,
}

impl Polynomial {
    /// Constructor; lowest power first.
    pub fn new(coefficients: Vec<Complex>) -> Polynomial {
        Polynomial { coefficients }
    }

    /// The coefficients, lowest power first.
    pub fn coefficients(&self) -> &[Complex] {
        &self.coefficients
    }

    /// The highest power present.  Both a constant and the empty
    /// polynomial report zero.
    pub fn order(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `z` using Horner's rule.
    pub fn evaluate(&self, z: Complex) -> Complex {
        self.coefficients
            .iter()
            .rev()
            .fold(Complex::zero(), |acc, c| acc * z + *c)
    }

    /// The first derivative.  The derivative of a constant is the empty
    /// polynomial.
    pub fn derive(&self) -> Polynomial {
        Polynomial::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, c)| *c * Complex::from_real(power as f64))
                .collect(),
        )
    }

    /// The product of two polynomials, by convolving their coefficients.
    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        if self.coefficients.is_empty() || other.coefficients.is_empty() {
            return Polynomial::new(vec![]);
        }
        let mut product = vec![Complex::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] = product[i + j] + *a * *b;
            }
        }
        Polynomial::new(product)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.coefficients.is_empty() {
            return write!(f, "0");
        }
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            if power != self.coefficients.len() - 1 {
                write!(f, " + ")?;
            }
            write!(f, "({}) * z^{}", c, power)?;
        }
        Ok(())
    }
}

/// A polynomial as a leading constant times a product of `(z - root)`
/// factors.
#[derive(Clone, Debug, PartialEq)]
pub struct RootedPolynomial {
    constant: Complex,
    roots: Vec<Complex>,
}

impl RootedPolynomial {
    /// Constructor.
    pub fn new(constant: Complex, roots: Vec<Complex>) -> RootedPolynomial {
        RootedPolynomial { constant, roots }
    }

    /// The leading constant.
    pub fn constant(&self) -> Complex {
        self.constant
    }

    /// The roots, in the order they were given.
    pub fn roots(&self) -> &[Complex] {
        &self.roots
    }

    /// One per root.
    pub fn order(&self) -> usize {
        self.roots.len()
    }

    /// Evaluates the product of factors directly.
    pub fn evaluate(&self, z: Complex) -> Complex {
        self.roots
            .iter()
            .fold(self.constant, |acc, root| acc * (z - *root))
    }

    /// Multiplies the factors out, root by root in the given order,
    /// starting from the leading constant.
    pub fn to_standard_form(&self) -> Polynomial {
        self.roots.iter().fold(
            Polynomial::new(vec![self.constant]),
            |acc, root| acc.multiply(&Polynomial::new(vec![-*root, Complex::ONE])),
        )
    }

    /// The index of the root nearest to `z`, provided it lies strictly
    /// closer than `threshold`.  On a tie the lower index wins.
    pub fn index_of_closest_root(&self, z: Complex, threshold: f64) -> Option<usize> {
        let mut best = threshold;
        let mut index = None;
        for (i, root) in self.roots.iter().enumerate() {
            let distance = (z - *root).magnitude();
            if distance < best {
                best = distance;
                index = Some(i);
            }
        }
        index
    }
}

impl fmt::Display for RootedPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.constant)?;
        for root in &self.roots {
            write!(f, "(z - ({}))", root)?;
        }
        Ok(())
    }
}
