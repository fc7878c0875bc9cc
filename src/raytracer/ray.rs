// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::vector::Point3;

/// A half-line: a starting point and a unit direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Where the ray starts
    pub origin: Point3,
    /// Unit vector along the ray
    pub direction: Point3,
}

impl Ray {
    /// The ray leaving `origin` and passing through `target`.
    pub fn from_points(origin: Point3, target: Point3) -> Ray {
        Ray {
            origin,
            direction: (target - origin).normalized(),
        }
    }

    /// The point `distance` along the ray.
    pub fn at(&self, distance: f64) -> Point3 {
        self.origin + self.direction * distance
    }
}
