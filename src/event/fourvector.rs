// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generic Lorentz vector.
//!
//! One type serves both roles: momentum vectors `(px, py, pz, e)` and
//! position vectors `(x, y, z, t)`. Accessors exist for both spellings.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub};

/// A four-component Lorentz vector with a `(x, y, z, t)` layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl FourVector {
    /// Create a vector from its components.
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        FourVector { x, y, z, t }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        FourVector::default()
    }

    /// x-component of momentum.
    pub fn px(&self) -> f64 {
        self.x
    }

    /// y-component of momentum.
    pub fn py(&self) -> f64 {
        self.y
    }

    /// z-component of momentum.
    pub fn pz(&self) -> f64 {
        self.z
    }

    /// Energy component.
    pub fn e(&self) -> f64 {
        self.t
    }

    /// Squared transverse component.
    pub fn perp2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Transverse component (momentum: `pt`).
    pub fn pt(&self) -> f64 {
        self.perp2().sqrt()
    }

    /// Magnitude of the spatial part (position: `length`).
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Magnitude of the spatial part (momentum: `p3mod`).
    pub fn p3mod(&self) -> f64 {
        self.length()
    }

    /// Squared invariant interval `t^2 - x^2 - y^2 - z^2`.
    pub fn interval(&self) -> f64 {
        self.t * self.t - self.x * self.x - self.y * self.y - self.z * self.z
    }

    /// Squared invariant mass. Same quantity as [`interval`](Self::interval).
    pub fn m2(&self) -> f64 {
        self.interval()
    }

    /// Invariant mass. Negative for spacelike vectors.
    pub fn m(&self) -> f64 {
        let m2 = self.m2();
        if m2 >= 0.0 {
            m2.sqrt()
        } else {
            -(-m2).sqrt()
        }
    }

    /// Azimuthal angle.
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Polar angle.
    pub fn theta(&self) -> f64 {
        self.pt().atan2(self.z)
    }

    /// Pseudorapidity. Returns +/- infinity on the beam axis.
    pub fn eta(&self) -> f64 {
        let p = self.p3mod();
        if p == self.z.abs() {
            if self.z >= 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            }
        } else {
            0.5 * ((p + self.z) / (p - self.z)).ln()
        }
    }

    /// True if all four components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0 && self.t == 0.0
    }

    /// Scale all components in place.
    pub fn scale(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
        self.t *= factor;
    }
}

impl Add for FourVector {
    type Output = FourVector;

    fn add(self, rhs: FourVector) -> FourVector {
        FourVector::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.t + rhs.t,
        )
    }
}

impl AddAssign for FourVector {
    fn add_assign(&mut self, rhs: FourVector) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
        self.t += rhs.t;
    }
}

impl Sub for FourVector {
    type Output = FourVector;

    fn sub(self, rhs: FourVector) -> FourVector {
        FourVector::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.t - rhs.t,
        )
    }
}

impl Neg for FourVector {
    type Output = FourVector;

    fn neg(self) -> FourVector {
        FourVector::new(-self.x, -self.y, -self.z, -self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_accessors() {
        let v = FourVector::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.px(), 1.0);
        assert_eq!(v.py(), 2.0);
        assert_eq!(v.pz(), 3.0);
        assert_eq!(v.e(), 4.0);
    }

    #[test]
    fn test_invariant_mass() {
        let v = FourVector::new(0.0, 0.0, 3.0, 5.0);
        assert_eq!(v.m2(), 16.0);
        assert_eq!(v.m(), 4.0);
    }

    #[test]
    fn test_spacelike_mass_is_negative() {
        let v = FourVector::new(0.0, 0.0, 5.0, 3.0);
        assert_eq!(v.m2(), -16.0);
        assert_eq!(v.m(), -4.0);
    }

    #[test]
    fn test_transverse_component() {
        let v = FourVector::new(3.0, 4.0, 12.0, 13.0);
        assert_eq!(v.perp2(), 25.0);
        assert_eq!(v.pt(), 5.0);
        assert_eq!(v.p3mod(), 13.0);
        assert_eq!(v.length(), 13.0);
    }

    #[test]
    fn test_eta_on_axis_is_infinite() {
        let fwd = FourVector::new(0.0, 0.0, 10.0, 10.0);
        let bwd = FourVector::new(0.0, 0.0, -10.0, 10.0);
        assert!(fwd.eta().is_infinite() && fwd.eta() > 0.0);
        assert!(bwd.eta().is_infinite() && bwd.eta() < 0.0);
    }

    #[test]
    fn test_eta_symmetric() {
        let v = FourVector::new(1.0, 0.0, 2.0, 3.0);
        let w = FourVector::new(1.0, 0.0, -2.0, 3.0);
        assert!((v.eta() + w.eta()).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = FourVector::new(1.0, 2.0, 3.0, 4.0);
        let b = FourVector::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b, FourVector::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a - b, FourVector::new(0.5, 1.5, 2.5, 3.5));
        assert_eq!(-a, FourVector::new(-1.0, -2.0, -3.0, -4.0));
    }

    #[test]
    fn test_scale() {
        let mut v = FourVector::new(1.0, 2.0, 3.0, 4.0);
        v.scale(1000.0);
        assert_eq!(v, FourVector::new(1000.0, 2000.0, 3000.0, 4000.0));
    }

    #[test]
    fn test_is_zero() {
        assert!(FourVector::zero().is_zero());
        assert!(!FourVector::new(0.0, 0.0, 0.0, 1e-300).is_zero());
    }
}
