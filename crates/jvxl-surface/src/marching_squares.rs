//! Contour lines and filled bands over a planar slice of a voxel grid.
//!
//! Marching cubes in contour mode leaves one [`ContourVertex`] per crossing of the
//! slicing plane. Those vertices become the pixels of a square grid whose values come
//! from the mapped data. Each contour level marks the squares it covers, and the bands
//! between consecutive levels are triangulated as fans.

use std::collections::HashMap;

use glam::{Mat3, Vec3};
use jvxl_core::{JvxlError, MeshData, Plane, Result, VolumeData};

use crate::tables::{INSIDE_MASK_TABLE_2D, SQUARE_EDGE_VERTICES, SQUARE_VERTEX_OFFSETS};

/// Smallest magnitude a contour level may have.
const LEVEL_NUDGE: f32 = 0.0001;

/// A crossing of the slicing plane, later used as a pixel of the contour grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourVertex {
    /// Lattice point at the low end of the crossed edge.
    pub voxel: [usize; 3],
    /// Pixel this vertex was assigned to; `[-1, -1]` until pixel data is loaded.
    pub pixel: [i32; 2],
    pub position: Vec3,
    pub value: f32,
    /// Index of the vertex in the mesh.
    pub vertex_index: u32,
}

impl ContourVertex {
    pub fn new(voxel: [usize; 3], position: Vec3, vertex_index: u32) -> Self {
        Self {
            voxel,
            pixel: [-1, -1],
            position,
            value: 0.0,
            vertex_index,
        }
    }
}

/// Axis along which a plane cuts the grid most steeply: 0, 1 or 2.
pub fn contour_type(plane: &Plane, vectors: &[Vec3; 3]) -> usize {
    let normal = plane.normal();
    let [dx, dy, dz] = vectors.map(|v| {
        let d = v.dot(normal);
        d * d
    });
    let max = dx.max(dy);
    if max < dz {
        2
    } else if max == dy {
        1
    } else {
        0
    }
}

/// Per-square state across all contour levels.
#[derive(Debug, Clone)]
struct PlanarSquare {
    /// Per level: `edges << 8 | edges << 4 | inside corners`.
    edge_mask12: Vec<u16>,
    /// Mesh vertices at the four corners.
    vertices: [Option<u32>; 4],
    /// Per level: mesh vertices where the level crosses each edge.
    intersections: Vec<[Option<u32>; 4]>,
    n_inside: usize,
    n_outside: usize,
    n_through: usize,
}

impl PlanarSquare {
    fn new(n_contours: usize) -> Self {
        Self {
            edge_mask12: vec![0; n_contours],
            vertices: [None; 4],
            intersections: vec![[None; 4]; n_contours],
            n_inside: 0,
            n_outside: 0,
            n_through: 0,
        }
    }

    fn set_vertex(&mut self, corner: usize, vertex: u32) {
        if let Some(existing) = self.vertices[corner] {
            if existing != vertex {
                log::error!("square corner {corner} already holds vertex {existing}, not {vertex}");
                return;
            }
        }
        self.vertices[corner] = Some(vertex);
    }

    fn add_edge_mask(&mut self, level: usize, edge_mask: u8, inside_mask: u8) {
        let edges = u16::from(edge_mask);
        self.edge_mask12[level] = (edges << 8) | (edges << 4) | u16::from(inside_mask);
        match inside_mask {
            0 => self.n_outside += 1,
            0x0F => self.n_inside += 1,
            _ => self.n_through += 1,
        }
    }
}

/// Inside test for contour levels; the sign of the level picks the direction.
fn is_inside_2d(value: f32, level: f32) -> bool {
    if level > 0.0 {
        value >= level
    } else {
        value <= level
    }
}

/// The contour levels spread from `red` towards `blue`, none of them exactly zero.
pub fn contour_levels(red: f32, blue: f32, n_contours: usize) -> Vec<f32> {
    (0..n_contours)
        .map(|i| {
            let level = red + (i as f32 / n_contours as f32) * (blue - red);
            if level.abs() < LEVEL_NUDGE {
                if level <= 0.0 {
                    -LEVEL_NUDGE
                } else {
                    LEVEL_NUDGE
                }
            } else {
                level
            }
        })
        .collect()
}

/// The square pixel grid of one planar slice.
#[derive(Debug, Clone)]
pub struct ContourGrid {
    planar_vectors: [Vec3; 2],
    /// Pixel offsets of the square corners in Cartesian space.
    corner_vectors: [Vec3; 4],
    /// Cartesian offset to pixel coordinates.
    xyz_to_plane: Mat3,
    origin: Vec3,
    pixel_counts: [usize; 2],
    pixels: Vec<f32>,
    square_counts: [usize; 2],
    squares: Vec<PlanarSquare>,
    n_contours: usize,
    is_plane: bool,
    /// Contour vertex positions by pixel, for function surfaces.
    positions: HashMap<[i32; 2], Vec3>,
    value_range: Option<(f32, f32)>,
}

impl ContourGrid {
    /// Lays a pixel grid over `vertices`.
    ///
    /// With a plane the grid spans the plane; without one the surface is a function
    /// of x and y and the pixels are the voxel columns.
    pub fn new(
        volume: &VolumeData,
        plane: Option<&Plane>,
        vertices: &[ContourVertex],
        n_contours: usize,
    ) -> Self {
        let vectors = volume.vectors;
        let (planar_vectors, pixel_counts) = match plane {
            Some(plane) => {
                let axis = contour_type(plane, &vectors);
                let normal = plane.normal();
                let v_z = vectors[axis];
                let denom = v_z.dot(normal);
                let project = |v: Vec3| {
                    if denom == 0.0 {
                        v
                    } else {
                        v - v_z * (v.dot(normal) / denom)
                    }
                };
                let (i, j) = match axis {
                    0 => (1, 2),
                    1 => (2, 0),
                    _ => (0, 1),
                };
                let side = volume.counts[i].max(volume.counts[j]).max(1);
                ([project(vectors[i]), project(vectors[j])], [side, side])
            }
            None => ([vectors[0], vectors[1]], [volume.counts[0], volume.counts[1]]),
        };

        let normal = planar_vectors[0].cross(planar_vectors[1]);
        let columns = Mat3::from_cols(planar_vectors[0], planar_vectors[1], normal);
        let xyz_to_plane = if columns.determinant() == 0.0 {
            log::warn!("planar vectors are degenerate; contour pixels will collapse");
            Mat3::ZERO
        } else {
            columns.inverse()
        };
        let [pv0, pv1] = planar_vectors;
        let square_counts = pixel_counts.map(|n| n.saturating_sub(1));
        let n_squares = square_counts[0] * square_counts[1];

        let mut grid = Self {
            planar_vectors,
            corner_vectors: [Vec3::ZERO, pv0, pv0 + pv1, pv1],
            xyz_to_plane,
            origin: Vec3::ZERO,
            pixel_counts,
            pixels: vec![0.0; pixel_counts[0] * pixel_counts[1]],
            square_counts,
            squares: vec![PlanarSquare::new(n_contours); n_squares],
            n_contours,
            is_plane: plane.is_some(),
            positions: HashMap::new(),
            value_range: None,
        };
        grid.origin = grid.planar_origin(vertices);
        log::info!(
            "contour grid: {}x{} pixels, origin {:?}, planar vectors {pv0:?} {pv1:?}",
            pixel_counts[0],
            pixel_counts[1],
            grid.origin
        );
        grid
    }

    pub fn pixel_counts(&self) -> [usize; 2] {
        self.pixel_counts
    }

    pub fn n_contours(&self) -> usize {
        self.n_contours
    }

    /// Min/max of the loaded pixel values.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.value_range
    }

    /// Corner of pixel (0, 0): the first vertex moved back to the lowest whole pixel.
    fn planar_origin(&mut self, vertices: &[ContourVertex]) -> Vec3 {
        let Some(first) = vertices.first() else {
            return Vec3::ZERO;
        };
        self.origin = first.position;
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        for vertex in vertices {
            let pt = self.xyz_to_pixel(vertex.position);
            min_x = min_x.min(pt.0);
            min_y = min_y.min(pt.1);
        }
        let [pv0, pv1] = self.planar_vectors;
        first.position + (min_x * 1.0001).trunc() * pv0 + (min_y * 1.0001).trunc() * pv1
    }

    /// Fractional pixel coordinates of a Cartesian point.
    fn xyz_to_pixel(&self, point: Vec3) -> (f32, f32) {
        let pt = self.xyz_to_plane * (point - self.origin);
        (pt.x, pt.y)
    }

    fn pixel_index(&self, x: usize, y: usize) -> usize {
        x * self.pixel_counts[1] + y
    }

    fn square_index(&self, x: usize, y: usize) -> usize {
        x * self.square_counts[1] + y
    }

    /// Fills pixels from the contour vertices.
    ///
    /// When `have_values` is false each vertex is valued by interpolating the voxel
    /// grid, and the value is written back into the grid at the vertex's voxel.
    pub fn load_pixel_data(
        &mut self,
        vertices: &mut [ContourVertex],
        volume: &mut VolumeData,
        mesh: &mut MeshData,
        have_values: bool,
    ) -> Result<()> {
        let flat_z = !self.is_plane;
        let (mut min, mut max) = (f32::MAX, -f32::MAX);
        let mut out_of_bounds = 0usize;
        for vertex in vertices.iter_mut() {
            let (px, py) = self.xyz_to_pixel(vertex.position);
            let x = (px + 0.5) as i32;
            let y = (py + 0.5) as i32;
            vertex.pixel = [x, y];

            if !have_values {
                vertex.value = volume.interpolated_value(vertex.position, flat_z).ok_or_else(|| {
                    JvxlError::State("no voxel data to value the contour pixels".into())
                })?;
                let [vx, vy, vz] = vertex.voxel;
                if let Some(voxels) = volume.voxels_mut() {
                    voxels.set(vx, vy, vz, vertex.value);
                }
            }
            let value = vertex.value;
            if let Some(v) = mesh.values.get_mut(vertex.vertex_index as usize) {
                *v = value;
            }
            if !value.is_nan() {
                min = min.min(value);
                max = max.max(value);
            }
            self.positions.entry([x, y]).or_insert(vertex.position);

            let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
                out_of_bounds += 1;
                continue;
            };
            if ux >= self.pixel_counts[0] || uy >= self.pixel_counts[1] {
                out_of_bounds += 1;
                continue;
            }
            let index = self.pixel_index(ux, uy);
            self.pixels[index] = value;
            self.assign_corners(ux, uy, vertex.vertex_index);
        }
        if out_of_bounds > 0 {
            log::error!("{out_of_bounds} contour vertices fell outside the pixel grid");
        }
        if min <= max {
            self.value_range = Some((min, max));
        }
        Ok(())
    }

    /// Pixel (x, y) is a corner of up to four squares.
    fn assign_corners(&mut self, x: usize, y: usize, vertex: u32) {
        let [scx, scy] = self.square_counts;
        if x < scx && y < scy {
            let i = self.square_index(x, y);
            self.squares[i].set_vertex(0, vertex);
        }
        if x > 0 && x <= scx && y < scy {
            let i = self.square_index(x - 1, y);
            self.squares[i].set_vertex(1, vertex);
        }
        if y > 0 && y <= scy && x < scx {
            let i = self.square_index(x, y - 1);
            self.squares[i].set_vertex(3, vertex);
        }
        if x > 0 && y > 0 && x <= scx && y <= scy {
            let i = self.square_index(x - 1, y - 1);
            self.squares[i].set_vertex(2, vertex);
        }
    }

    /// Marks every square for each level and adds the level crossings to `mesh`.
    pub fn create_contours(&mut self, mesh: &mut MeshData, red: f32, blue: f32) {
        let levels = contour_levels(red, blue, self.n_contours);
        log::info!("contouring {} levels from {red} to {blue}", levels.len());
        for (i, level) in levels.into_iter().enumerate() {
            self.generate_level(mesh, i, level);
        }
    }

    fn generate_level(&mut self, mesh: &mut MeshData, level: usize, cutoff: f32) {
        let [scx, scy] = self.square_counts;
        if scx == 0 || scy == 0 {
            return;
        }
        let mut cache = vec![[None::<u32>; 4]; scy];
        let mut values = [0.0_f32; 4];
        for x in (0..scx).rev() {
            for y in (0..scy).rev() {
                let mut crossings = [None; 4];
                if x + 1 < scx {
                    crossings[1] = cache[y][3];
                }
                if y + 1 < scy {
                    crossings[2] = cache[y + 1][0];
                }

                let mut inside_mask = 0u8;
                for corner in (0..4).rev() {
                    let [ox, oy] = SQUARE_VERTEX_OFFSETS[corner];
                    values[corner] = self.pixels[self.pixel_index(x + ox, y + oy)];
                    if is_inside_2d(values[corner], cutoff) {
                        inside_mask |= 1 << corner;
                    }
                }
                let index = self.square_index(x, y);
                if inside_mask == 0 {
                    cache[y] = crossings;
                    continue;
                }
                if inside_mask == 0x0F {
                    self.squares[index].add_edge_mask(level, 0, 0x0F);
                    cache[y] = crossings;
                    continue;
                }
                let edge_mask = INSIDE_MASK_TABLE_2D[usize::from(inside_mask)];
                self.squares[index].add_edge_mask(level, edge_mask, inside_mask);
                for edge in (0..4).rev() {
                    if edge_mask & (1 << edge) == 0 || crossings[edge].is_some() {
                        continue;
                    }
                    let [a, b] = SQUARE_EDGE_VERTICES[edge];
                    let (point_a, point_b) = self.edge_points(x, y, a, b);
                    let (value_a, value_b) = (values[a], values[b]);
                    let fraction = (cutoff - value_a) / (value_b - value_a);
                    let point = point_a + (point_b - point_a) * fraction;
                    crossings[edge] = Some(mesh.add_vertex(point, cutoff));
                }
                self.squares[index].intersections[level] = crossings;
                cache[y] = crossings;
            }
        }
    }

    /// Cartesian positions of two corners of square (x, y).
    fn edge_points(&self, x: usize, y: usize, a: usize, b: usize) -> (Vec3, Vec3) {
        if self.is_plane {
            let [pv0, pv1] = self.planar_vectors;
            let pixel_origin = self.origin + x as f32 * pv0 + y as f32 * pv1;
            (
                pixel_origin + self.corner_vectors[a],
                pixel_origin + self.corner_vectors[b],
            )
        } else {
            let at = |corner: usize| {
                let [ox, oy] = SQUARE_VERTEX_OFFSETS[corner];
                let key = [(x + ox) as i32, (y + oy) as i32];
                self.positions.get(&key).copied().unwrap_or(Vec3::NAN)
            };
            (at(a), at(b))
        }
    }

    /// Fills the bands between consecutive levels; `this_contour` keeps one 1-based level.
    pub fn triangulate(&self, mesh: &mut MeshData, this_contour: Option<usize>) {
        let mut added = 0usize;
        for level in 0..self.n_contours {
            if this_contour.is_some_and(|t| t != level + 1) {
                continue;
            }
            for square in &self.squares {
                added += self.triangulate_square(mesh, square, level);
            }
        }
        log::info!("contour bands: {added} triangles");
    }

    fn triangulate_square(&self, mesh: &mut MeshData, square: &PlanarSquare, level: usize) -> usize {
        let mask = square.edge_mask12[level] & 0xFF;
        if mask == 0 {
            return 0;
        }
        let has_next = level + 1 < self.n_contours;
        if mask == 0x0F && has_next && square.edge_mask12[level + 1] == 0x0F {
            return 0;
        }
        let mut edge_mask = mask;
        let mut is_ok = true;
        if has_next {
            let next = square.edge_mask12[level + 1];
            if next != 0x0F {
                is_ok = false;
                edge_mask ^= next & 0x0F0F;
            }
        }
        if level > 0 && edge_mask == 0 {
            return 0;
        }
        let first = fill_square(square, level, edge_mask, false);
        let mut added = fan(mesh, &first);
        if !is_ok {
            let second = fill_square(square, level, edge_mask, true);
            if second != first {
                added += fan(mesh, &second);
            }
        }
        added
    }

    /// Bilinear pixel value at a Cartesian point, clamped to the grid.
    pub fn interpolated_value(&self, point: Vec3) -> f32 {
        let [nx, ny] = self.pixel_counts;
        if nx == 0 || ny == 0 {
            return f32::NAN;
        }
        let (px, py) = self.xyz_to_pixel(point);
        let bracket = |p: f32, n: usize| {
            let max = n - 1;
            let i0 = (p.floor().max(0.0) as usize).min(max);
            let i1 = (i0 + 1).min(max);
            let f = (p - i0 as f32).clamp(0.0, 1.0);
            (i0, i1, f)
        };
        let (x0, x1, fx) = bracket(px, nx);
        let (y0, y1, fy) = bracket(py, ny);
        let v00 = self.pixels[self.pixel_index(x0, y0)];
        let v10 = self.pixels[self.pixel_index(x1, y0)];
        let v01 = self.pixels[self.pixel_index(x0, y1)];
        let v11 = self.pixels[self.pixel_index(x1, y1)];
        let low = v00 + fx * (v10 - v00);
        let high = v01 + fx * (v11 - v01);
        low + fy * (high - low)
    }

    /// Squares fully inside, fully outside and crossed, summed over levels.
    pub fn square_census(&self) -> (usize, usize, usize) {
        self.squares.iter().fold((0, 0, 0), |(i, o, t), s| {
            (i + s.n_inside, o + s.n_outside, t + s.n_through)
        })
    }
}

/// Band polygon of one square, walking corners and crossings in order.
///
/// `reverse` starts with the next level's crossing ahead of this level's, which
/// fixes the winding of squares crossed by two contours.
fn fill_square(square: &PlanarSquare, level: usize, edge_mask: u16, reverse: bool) -> Vec<u32> {
    let mut polygon = Vec::with_capacity(12);
    let mut flip = reverse;
    let mut n_intersect = 0;
    let next = square.intersections.get(level + 1);
    for k in 0..4 {
        let mut is_new = false;
        if edge_mask & (1 << k) != 0 {
            polygon.extend(square.vertices[k]);
        }
        let next_crossing = edge_mask & (1 << (8 + k)) != 0;
        if flip && next_crossing {
            n_intersect += 1;
            is_new = true;
            polygon.extend(next.and_then(|n| n[k]));
        }
        if edge_mask & (1 << (4 + k)) != 0 {
            n_intersect += 1;
            is_new = true;
            polygon.extend(square.intersections[level][k]);
        }
        if !flip && next_crossing {
            n_intersect += 1;
            is_new = true;
            polygon.extend(next.and_then(|n| n[k]));
        }
        if n_intersect == 2 && is_new {
            flip = !flip;
        }
    }
    polygon
}

/// Fan from the first vertex; returns the number of triangles kept.
fn fan(mesh: &mut MeshData, polygon: &[u32]) -> usize {
    let Some((&first, rest)) = polygon.split_first() else {
        return 0;
    };
    rest.windows(2)
        .filter(|pair| mesh.add_triangle_checked(first, pair[0], pair[1], 7))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marching_cubes::MarchingCubes;
    use jvxl_core::Grid3D;

    fn unit_volume(counts: [usize; 3]) -> VolumeData {
        VolumeData::new(Vec3::ZERO, [Vec3::X, Vec3::Y, Vec3::Z], counts)
    }

    /// Plane-distance voxels for `plane`, contoured like the generator does.
    fn plane_slice(counts: [usize; 3], plane: Plane) -> (VolumeData, MeshData, Vec<ContourVertex>) {
        let mut volume = unit_volume(counts);
        let mut grid = Grid3D::new(counts);
        for x in 0..counts[0] {
            for y in 0..counts[1] {
                for z in 0..counts[2] {
                    grid.set(x, y, z, volume.plane_distance(x, y, z, &plane));
                }
            }
        }
        volume.set_voxels(grid).unwrap();
        let mut mesh = MeshData::new();
        let axis = contour_type(&plane, &volume.vectors);
        let out = MarchingCubes::new(&volume, 0.0)
            .contour_type(Some(axis))
            .generate(&mut mesh)
            .unwrap();
        (volume, mesh, out.contour_vertices)
    }

    fn map_values(volume: &mut VolumeData, f: impl Fn(usize, usize, usize) -> f32) {
        let counts = volume.counts;
        let mut grid = Grid3D::new(counts);
        for x in 0..counts[0] {
            for y in 0..counts[1] {
                for z in 0..counts[2] {
                    grid.set(x, y, z, f(x, y, z));
                }
            }
        }
        volume.set_voxels(grid).unwrap();
    }

    #[test]
    fn test_contour_type() {
        let vectors = [Vec3::X, Vec3::Y, Vec3::Z];
        assert_eq!(contour_type(&Plane::new(0.0, 0.0, 1.0, 0.0), &vectors), 2);
        assert_eq!(contour_type(&Plane::new(1.0, 0.0, 0.0, 0.0), &vectors), 0);
        assert_eq!(contour_type(&Plane::new(0.0, 1.0, 0.0, 0.0), &vectors), 1);
        assert_eq!(contour_type(&Plane::new(1.0, 1.0, 0.0, 0.0), &vectors), 1);
    }

    #[test]
    fn test_levels_avoid_zero() {
        let levels = contour_levels(0.0, 4.0, 4);
        assert_eq!(levels, vec![-LEVEL_NUDGE, 1.0, 2.0, 3.0]);
        let levels = contour_levels(-1.0, 1.0, 4);
        assert_eq!(levels, vec![-1.0, -0.5, -LEVEL_NUDGE, 0.5]);
        assert!(contour_levels(-2.0, 2.0, 11).len() <= 11);
    }

    #[test]
    fn test_single_square_fill() {
        let (mut volume, mut mesh, mut vertices) = plane_slice([2, 2, 2], Plane::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(vertices.len(), 4);
        let mut grid = ContourGrid::new(&volume, Some(&Plane::new(0.0, 0.0, 1.0, 0.0)), &vertices, 1);
        assert_eq!(grid.pixel_counts(), [2, 2]);
        map_values(&mut volume, |_, _, _| 1.0);
        grid.load_pixel_data(&mut vertices, &mut volume, &mut mesh, false).unwrap();
        assert_eq!(grid.value_range(), Some((1.0, 1.0)));
        grid.create_contours(&mut mesh, 0.5, 1.5);
        grid.triangulate(&mut mesh, None);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(grid.square_census(), (1, 0, 0));
    }

    #[test]
    fn test_plane_bands() {
        let plane = Plane::new(0.0, 0.0, 1.0, -2.0);
        let (mut volume, mut mesh, mut vertices) = plane_slice([5, 5, 5], plane);
        assert_eq!(vertices.len(), 25);
        let mut grid = ContourGrid::new(&volume, Some(&plane), &vertices, 4);
        map_values(&mut volume, |x, _, _| x as f32);
        grid.load_pixel_data(&mut vertices, &mut volume, &mut mesh, false).unwrap();
        let (min, max) = grid.value_range().unwrap();
        assert!((min - 0.0).abs() < 1e-4 && (max - 4.0).abs() < 1e-4);

        grid.create_contours(&mut mesh, 0.0, 4.0);
        grid.triangulate(&mut mesh, None);
        assert!(mesh.triangle_count() > 0);
        for tri in &mesh.triangles {
            for &v in &tri.vertices {
                let p = mesh.vertices[v as usize];
                assert!(p.is_finite());
                assert!((p.z - 2.0).abs() < 1e-4);
            }
        }

        let value = grid.interpolated_value(Vec3::new(2.5, 1.0, 2.0));
        assert!((value - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_single_level_output() {
        let plane = Plane::new(0.0, 0.0, 1.0, -1.0);
        let (mut volume, mut mesh, mut vertices) = plane_slice([4, 4, 3], plane);
        let mut grid = ContourGrid::new(&volume, Some(&plane), &vertices, 3);
        map_values(&mut volume, |x, y, _| (x + y) as f32);
        grid.load_pixel_data(&mut vertices, &mut volume, &mut mesh, false).unwrap();
        grid.create_contours(&mut mesh, 0.0, 6.0);

        let mut all = mesh.clone();
        grid.triangulate(&mut all, None);
        let mut one = mesh.clone();
        grid.triangulate(&mut one, Some(2));
        assert!(one.triangle_count() > 0);
        assert!(one.triangle_count() < all.triangle_count());
    }

    #[test]
    fn test_empty_vertices() {
        let volume = unit_volume([3, 3, 3]);
        let grid = ContourGrid::new(&volume, Some(&Plane::default()), &[], 2);
        assert_eq!(grid.origin, Vec3::ZERO);
        assert_eq!(grid.value_range(), None);
    }
}
