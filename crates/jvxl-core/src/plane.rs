//! Cutting planes `a x + b y + c z + d = 0`.

use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::JvxlError;

/// A plane in implicit form.
///
/// Positive signed distances lie on the side the normal `(a, b, c)` points to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Default for Plane {
    /// The plane `z = 0`.
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 0.0)
    }
}

impl Plane {
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Creates the plane through `origin` with the given normal.
    pub fn from_point_normal(origin: Vec3, normal: Vec3) -> Self {
        Self::new(normal.x, normal.y, normal.z, -normal.dot(origin))
    }

    /// Returns the (unnormalized) normal `(a, b, c)`.
    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// A plane with a zero normal is taken as `{0 0 1 d}`.
    #[must_use]
    pub fn with_valid_normal(self) -> Self {
        if self.normal() == Vec3::ZERO {
            Self { c: 1.0, ..self }
        } else {
            self
        }
    }

    /// Returns the signed distance from a point to the plane.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        let normal = self.normal();
        let len = normal.length();
        if len <= f32::EPSILON {
            return point.z + self.d;
        }
        (normal.dot(point) + self.d) / len
    }

    /// Projects a point onto the plane.
    pub fn project(&self, point: Vec3) -> Vec3 {
        let normal = self.normal().normalize_or_zero();
        point - normal * self.signed_distance(point)
    }

    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.a, self.b, self.c, self.d)
    }
}

impl From<Vec4> for Plane {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.a, self.b, self.c, self.d)
    }
}

impl FromStr for Plane {
    type Err = JvxlError;

    /// Parses four numbers separated by spaces or commas, optionally in braces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f32> = s
            .split(|c: char| c.is_whitespace() || c == ',' || c == '{' || c == '}')
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|e| JvxlError::InvalidProperty {
                name: "plane".into(),
                message: format!("{s:?}: {e}"),
            })?;
        match values.as_slice() {
            [a, b, c, d] => Ok(Self::new(*a, *b, *c, *d)),
            _ => Err(JvxlError::InvalidProperty {
                name: "plane".into(),
                message: format!("expected 4 numbers, got {}", values.len()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_distance() {
        let plane = Plane::new(0.0, 0.0, 2.0, -2.0);
        assert!((plane.signed_distance(Vec3::new(5.0, 5.0, 3.0)) - 2.0).abs() < 1e-6);
        assert!((plane.signed_distance(Vec3::new(0.0, 0.0, 0.0)) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_project() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let p = plane.project(Vec3::new(3.0, 7.0, -2.0));
        assert!((p - Vec3::new(3.0, 1.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn test_zero_normal_becomes_z() {
        let plane = Plane::new(0.0, 0.0, 0.0, 4.0).with_valid_normal();
        assert_eq!(plane, Plane::new(0.0, 0.0, 1.0, 4.0));
    }

    #[test]
    fn test_parse() {
        let plane: Plane = "{1, 0, 0 -0.5}".parse().unwrap();
        assert_eq!(plane, Plane::new(1.0, 0.0, 0.0, -0.5));
        assert!("1 2 3".parse::<Plane>().is_err());
        assert!("1 2 x 4".parse::<Plane>().is_err());
    }
}
