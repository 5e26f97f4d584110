//! Volumetric grids: origin, three voxel vectors, counts and the dense value array.

use glam::Vec3;

use crate::error::{JvxlError, Result};
use crate::plane::Plane;

/// Dense 3D array stored x-major: the value at `(x, y, z)` lives at `(x * ny + y) * nz + z`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3D<T> {
    counts: [usize; 3],
    data: Vec<T>,
}

impl<T: Copy + Default> Grid3D<T> {
    /// Creates a grid filled with `T::default()`.
    pub fn new(counts: [usize; 3]) -> Self {
        Self {
            counts,
            data: vec![T::default(); counts[0] * counts[1] * counts[2]],
        }
    }

    /// Wraps existing values; `data.len()` must equal the product of `counts`.
    pub fn from_vec(counts: [usize; 3], data: Vec<T>) -> Result<Self> {
        let expected = counts[0] * counts[1] * counts[2];
        if data.len() != expected {
            return Err(JvxlError::Geometry {
                counts,
                message: format!("expected {expected} values, got {}", data.len()),
            });
        }
        Ok(Self { counts, data })
    }

    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.counts[1] + y) * self.counts[2] + z
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        self.data[self.index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        let i = self.index(x, y, z);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// A scalar field sampled on a parallelepiped lattice.
///
/// Plane and interpolation math assume the three vectors are orthogonal.
#[derive(Debug, Clone, Default)]
pub struct VolumeData {
    pub origin: Vec3,
    pub vectors: [Vec3; 3],
    pub counts: [usize; 3],
    voxels: Option<Grid3D<f32>>,
}

impl VolumeData {
    pub fn new(origin: Vec3, vectors: [Vec3; 3], counts: [usize; 3]) -> Self {
        Self {
            origin,
            vectors,
            counts,
            voxels: None,
        }
    }

    /// Total number of lattice points.
    pub fn point_count(&self) -> usize {
        self.counts[0] * self.counts[1] * self.counts[2]
    }

    pub fn voxels(&self) -> Option<&Grid3D<f32>> {
        self.voxels.as_ref()
    }

    pub fn voxels_mut(&mut self) -> Option<&mut Grid3D<f32>> {
        self.voxels.as_mut()
    }

    /// Installs a new value array; its counts must match the lattice.
    pub fn set_voxels(&mut self, voxels: Grid3D<f32>) -> Result<()> {
        if voxels.counts() != self.counts {
            return Err(JvxlError::Geometry {
                counts: voxels.counts(),
                message: format!("grid does not match volume counts {:?}", self.counts),
            });
        }
        self.voxels = Some(voxels);
        Ok(())
    }

    /// Releases the value array, keeping the lattice description.
    pub fn discard_voxels(&mut self) -> Option<Grid3D<f32>> {
        self.voxels.take()
    }

    /// Lattice point to Cartesian coordinates.
    pub fn voxel_point_to_xyz(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.origin
            + self.vectors[0] * x as f32
            + self.vectors[1] * y as f32
            + self.vectors[2] * z as f32
    }

    pub fn vector_lengths(&self) -> [f32; 3] {
        self.vectors.map(Vec3::length)
    }

    /// Cartesian coordinates to fractional lattice coordinates (orthogonal grids only).
    pub fn xyz_to_voxel_point(&self, point: Vec3) -> Vec3 {
        let offset = point - self.origin;
        let scale = |v: Vec3| {
            let len_sq = v.length_squared();
            if len_sq > 0.0 {
                offset.dot(v) / len_sq
            } else {
                0.0
            }
        };
        Vec3::new(
            scale(self.vectors[0]),
            scale(self.vectors[1]),
            scale(self.vectors[2]),
        )
    }

    /// Trilinear interpolation at a Cartesian point, clamped to the grid.
    ///
    /// `flat_z` skips the z interpolation, as used for single-layer function grids.
    pub fn interpolated_value(&self, point: Vec3, flat_z: bool) -> Option<f32> {
        let voxels = self.voxels.as_ref()?;
        let pt = self.xyz_to_voxel_point(point);
        let (x0, x1) = bracket(pt.x, self.counts[0], false);
        let (y0, y1) = bracket(pt.y, self.counts[1], false);
        let (z0, z1) = bracket(pt.z, self.counts[2], flat_z);
        let fx = pt.x - x0 as f32;
        let fy = pt.y - y0 as f32;
        let v1 = bilinear(
            fx,
            fy,
            voxels.get(x0, y0, z0),
            voxels.get(x1, y0, z0),
            voxels.get(x0, y1, z0),
            voxels.get(x1, y1, z0),
        );
        let v2 = bilinear(
            fx,
            fy,
            voxels.get(x0, y0, z1),
            voxels.get(x1, y0, z1),
            voxels.get(x0, y1, z1),
            voxels.get(x1, y1, z1),
        );
        Some(v1 + (pt.z - z0 as f32) * (v2 - v1))
    }

    /// Signed distance from a lattice point to `plane`.
    pub fn plane_distance(&self, x: usize, y: usize, z: usize, plane: &Plane) -> f32 {
        plane.signed_distance(self.voxel_point_to_xyz(x, y, z))
    }

    /// Logs a warning for each pair of voxel vectors that is neither parallel nor orthogonal.
    pub fn check_orthogonality(&self) -> bool {
        let units = self.vectors.map(Vec3::normalize_or_zero);
        let mut orthogonal = true;
        for i in 0..3 {
            for j in 0..i {
                let test = units[i].dot(units[j]).abs();
                if test > 1.001 || (test < 0.999 && test > 0.001) {
                    log::warn!("voxel coordinate vectors {j} and {i} are not orthogonal");
                    orthogonal = false;
                }
            }
        }
        orthogonal
    }
}

/// Lower and upper lattice index around a fractional coordinate.
fn bracket(value: f32, count: usize, flat: bool) -> (usize, usize) {
    let max = count.saturating_sub(1);
    let down = if value < 0.0 {
        0
    } else {
        (value as usize).min(max)
    };
    let up = if value < 0.0 || down == max || flat {
        down
    } else {
        down + 1
    };
    (down, up)
}

fn bilinear(fx: f32, fy: f32, x11: f32, x12: f32, x21: f32, x22: f32) -> f32 {
    let v1 = x11 + fx * (x12 - x11);
    let v2 = x21 + fx * (x22 - x21);
    v1 + fy * (v2 - v1)
}
