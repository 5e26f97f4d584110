//! Voxel value loading for CUBE, APBS DX and JVXL sources.
//!
//! Direct sources yield one float per lattice point, x-major. JVXL sources store only
//! the inside/outside pattern as alternating run lengths, which is expanded back to a
//! 0/1 grid; the edge and color blocks that follow are decompressed verbatim.

use std::collections::VecDeque;
use std::fmt::Write;

use jvxl_core::{
    decompress, Grid3D, JvxlError, LineReader, LineSource, Plane, Result, SurfaceParams,
    TruncatedDataPolicy,
};

use crate::definition::SurfaceDefinition;
use crate::header::VolumeHeader;
use crate::marching_cubes::is_inside;
use crate::text::{count_tokens, sum_ints, Tokens};

/// Cutoff used to rebuild a surface from JVXL inside/outside data.
pub const JVXL_CUTOFF: f32 = 0.5;
/// Reconstruction cutoff for bicolor and sign-colored JVXL surfaces.
pub const JVXL_BICOLOR_CUTOFF: f32 = 0.01;

/// Run length substituted when a JVXL surface stream ends early.
const JVXL_EOF_RUN: usize = 10_000;

/// The result of reading one surface's worth of data.
#[derive(Debug, Clone)]
pub struct VoxelLoad {
    pub voxels: Grid3D<f32>,
    /// Cutoff the voxels are meant to be contoured at.
    pub cutoff: f32,
    /// Run-length inside/outside stream; empty for planes and map data.
    pub surface_data: String,
    /// Bytes of voxel text consumed, used for the compression ratio.
    pub n_bytes: usize,
    /// Definition line of a JVXL surface.
    pub definition: Option<SurfaceDefinition>,
    pub edge_data: String,
    pub color_data: String,
}

/// Collects the inside/outside pattern as alternating run lengths, starting outside.
///
/// A grid whose first point is inside starts with an empty ` 0` outside run.
#[derive(Debug, Default)]
pub struct SurfaceRuns {
    text: String,
    inside: bool,
    count: usize,
}

impl SurfaceRuns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, inside: bool) {
        if inside != self.inside {
            let _ = write!(self.text, " {}", self.count);
            self.count = 0;
            self.inside = inside;
        }
        self.count += 1;
    }

    pub fn finish(mut self) -> String {
        let _ = writeln!(self.text, " {}", self.count);
        self.text
    }
}

/// Float values from a line-oriented stream, any number per line.
struct ValueStream<'r, S> {
    reader: &'r mut LineReader<S>,
    pending: VecDeque<f32>,
    policy: TruncatedDataPolicy,
    expected: usize,
    values_read: usize,
    n_bytes: usize,
    end_of_data: bool,
}

impl<'r, S: LineSource> ValueStream<'r, S> {
    fn new(reader: &'r mut LineReader<S>, policy: TruncatedDataPolicy, expected: usize) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            policy,
            expected,
            values_read: 0,
            n_bytes: 0,
            end_of_data: false,
        }
    }

    fn next_value(&mut self) -> Result<f32> {
        loop {
            if let Some(value) = self.pending.pop_front() {
                self.values_read += 1;
                return Ok(value);
            }
            let Some(line) = self.reader.next_line()? else {
                return self.truncated();
            };
            self.n_bytes += line.len() + 1;
            let before = self.pending.len();
            self.pending.extend(Tokens::new(&line).floats());
            if self.pending.len() == before && !line.trim().is_empty() {
                log::warn!(
                    "skipping unreadable voxel data at line {}: '{line}'",
                    self.reader.line_number()
                );
            }
        }
    }

    fn truncated(&mut self) -> Result<f32> {
        if self.policy == TruncatedDataPolicy::Error {
            return Err(JvxlError::UnexpectedEof {
                expected: self.expected,
                read: self.values_read,
            });
        }
        if !self.end_of_data {
            log::warn!(
                "end of file reading voxel data after {} of {} values ({} bytes); filling with zeros",
                self.values_read,
                self.expected,
                self.n_bytes
            );
            self.end_of_data = true;
        }
        self.values_read += 1;
        Ok(0.0)
    }
}

/// Expands JVXL run lengths into inside/outside flags, keeping the raw lines.
struct RunStream<'r, S> {
    reader: &'r mut LineReader<S>,
    pending: VecDeque<usize>,
    run_left: usize,
    inside: bool,
    raw: String,
    policy: TruncatedDataPolicy,
    end_of_data: bool,
}

impl<'r, S: LineSource> RunStream<'r, S> {
    fn new(reader: &'r mut LineReader<S>, policy: TruncatedDataPolicy) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            run_left: 0,
            // toggled to outside by the first run
            inside: true,
            raw: String::new(),
            policy,
            end_of_data: false,
        }
    }

    fn next_inside(&mut self, expected: usize, read: usize) -> Result<bool> {
        while self.run_left == 0 {
            if let Some(n) = self.pending.pop_front() {
                self.inside = !self.inside;
                self.run_left = n;
                continue;
            }
            match self.reader.next_line()? {
                Some(line) => {
                    let before = self.pending.len();
                    self.pending
                        .extend(line.split_whitespace().map_while(|t| t.parse::<usize>().ok()));
                    if self.pending.len() == before {
                        log::warn!("skipping line without surface run lengths: '{line}'");
                        continue;
                    }
                    self.raw.push_str(&line);
                    self.raw.push('\n');
                }
                None => {
                    if self.policy == TruncatedDataPolicy::Error {
                        return Err(JvxlError::UnexpectedEof { expected, read });
                    }
                    if !self.end_of_data {
                        log::error!("end of file reading JVXL surface data after {read} of {expected} points");
                        self.end_of_data = true;
                    }
                    self.pending.push_back(JVXL_EOF_RUN);
                }
            }
        }
        self.run_left -= 1;
        Ok(self.inside)
    }
}

/// Where the values of the current pass come from.
enum VoxelSource<'r, S> {
    Plane(Plane),
    Runs(RunStream<'r, S>),
    Values(ValueStream<'r, S>),
    /// A JVXL surface without inside/outside data.
    Empty,
}

/// Reads the voxel values of the surface selected by `params.file_index`.
///
/// JVXL definition lines update `params`. With a plane and `is_map_data` unset the
/// voxels are plane distances and no data lines are consumed from a direct source,
/// so the same stream can supply mapping values afterwards.
pub fn read_voxel_data<S: LineSource>(
    reader: &mut LineReader<S>,
    header: &VolumeHeader,
    params: &mut SurfaceParams,
    is_map_data: bool,
) -> Result<VoxelLoad> {
    let counts = header.volume.counts;
    if counts.contains(&0) {
        return Err(JvxlError::Geometry {
            counts,
            message: "every axis needs at least one point".into(),
        });
    }
    let n_points = header.point_count();
    clamp_file_index(header, params);

    let just_defining_plane = !is_map_data && params.plane.is_some();
    let mut definition = None;
    if header.is_jvxl() || !just_defining_plane {
        definition = goto_data(reader, header, params)?;
    }
    if let Some(def) = &definition {
        def.apply_to(params);
    }

    let plane = params.plane.map(Plane::with_valid_normal);
    let cutoff = if plane.is_some() {
        0.0
    } else if header.is_jvxl() {
        if params.is_bicolor_map || params.color_by_sign {
            JVXL_BICOLOR_CUTOFF
        } else {
            JVXL_CUTOFF
        }
    } else {
        params.cutoff_or_default()
    };
    let just_defining_plane = !is_map_data && plane.is_some();
    let collect_runs = !is_map_data && !(header.is_jvxl() && plane.is_none());
    let has_jvxl_runs = definition.as_ref().is_some_and(|d| d.surface_count > 0);

    let mut source = if let (true, Some(plane)) = (just_defining_plane, plane) {
        VoxelSource::Plane(plane)
    } else if header.is_jvxl() {
        if has_jvxl_runs {
            VoxelSource::Runs(RunStream::new(reader, params.truncated_data))
        } else {
            VoxelSource::Empty
        }
    } else {
        VoxelSource::Values(ValueStream::new(reader, params.truncated_data, n_points))
    };

    let [nx, ny, nz] = counts;
    let mut voxels = Grid3D::new(counts);
    let mut runs = SurfaceRuns::new();
    let mut n_read = 0;
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let value = match &mut source {
                    VoxelSource::Plane(plane) => header.volume.plane_distance(x, y, z, plane),
                    VoxelSource::Runs(stream) => {
                        if stream.next_inside(n_points, n_read)? {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    VoxelSource::Values(values) => next_direct_value(values, header, params)?,
                    VoxelSource::Empty => 0.0,
                };
                voxels.set(x, y, z, value);
                n_read += 1;
                if collect_runs {
                    runs.push(is_inside(value, cutoff, params.is_cutoff_absolute));
                }
            }
        }
    }
    let (surface_text, n_bytes) = match source {
        VoxelSource::Runs(stream) => (stream.raw, 0),
        VoxelSource::Values(values) => (String::new(), values.n_bytes),
        VoxelSource::Plane(_) | VoxelSource::Empty => (String::new(), 0),
    };

    let surface_data = if is_map_data || plane.is_some() {
        String::new()
    } else if header.is_jvxl() {
        surface_text
    } else {
        runs.finish()
    };

    let (mut edge_data, mut color_data) = (String::new(), String::new());
    if let Some(def) = &definition {
        if def.edge_count > 0 {
            edge_data = read_block(reader, def.edge_count, "edge", params.truncated_data)?;
        }
        if def.color_count > 0 {
            color_data = read_block(reader, def.color_count, "color", params.truncated_data)?;
        }
    }
    log::info!("read {n_read} voxel values, cutoff {cutoff}");

    Ok(VoxelLoad {
        voxels,
        cutoff,
        surface_data,
        n_bytes,
        definition,
        edge_data,
        color_data,
    })
}

/// Positions a JVXL stream at the color block of the selected surface and reads it.
pub fn read_jvxl_color_data<S: LineSource>(
    reader: &mut LineReader<S>,
    header: &VolumeHeader,
    params: &mut SurfaceParams,
) -> Result<(SurfaceDefinition, String)> {
    clamp_file_index(header, params);
    let def = goto_data(reader, header, params)?.ok_or_else(|| {
        JvxlError::State("color data can only be read back from a JVXL source".into())
    })?;
    skip_jvxl_surface(reader, &def, header.point_count(), false)?;
    let color_data = if def.color_count > 0 {
        read_block(reader, def.color_count, "color", params.truncated_data)?
    } else {
        String::new()
    };
    Ok((def, color_data))
}

fn clamp_file_index(header: &VolumeHeader, params: &mut SurfaceParams) {
    if params.file_index == 0 {
        params.file_index = 1;
    }
    if header.n_surfaces < params.file_index {
        log::warn!(
            "not enough surfaces in file; resetting file index to {}",
            header.n_surfaces
        );
        params.file_index = header.n_surfaces.max(1);
    }
}

/// Skips the surfaces before `params.file_index`, returning the target JVXL definition.
fn goto_data<S: LineSource>(
    reader: &mut LineReader<S>,
    header: &VolumeHeader,
    params: &SurfaceParams,
) -> Result<Option<SurfaceDefinition>> {
    let n_points = header.point_count();
    let skip = params.file_index.saturating_sub(1);
    if skip > 0 {
        log::info!("skipping {skip} data sets, {n_points} points each");
    }
    for _ in 0..skip {
        if header.is_jvxl() {
            let def = read_definition(reader)?;
            log::info!(
                "JVXL skipping: surface count {} edge count {} color mapped {}",
                def.surface_count,
                def.edge_count,
                def.is_color_mapped
            );
            skip_jvxl_surface(reader, &def, n_points, true)?;
        } else if params.block_data {
            skip_lines(reader, n_points, count_tokens)?;
        }
    }
    if header.is_jvxl() {
        return read_definition(reader).map(Some);
    }
    Ok(None)
}

/// Reads the next non-comment line as a surface definition.
pub fn read_definition<S: LineSource>(reader: &mut LineReader<S>) -> Result<SurfaceDefinition> {
    let line = reader.next_data_line()?.ok_or_else(|| {
        JvxlError::header(reader.line_number() + 1, "missing JVXL surface definition line")
    })?;
    log::info!("JVXL definition line: {line}");
    SurfaceDefinition::parse(&line, reader.line_number())
}

fn skip_jvxl_surface<S: LineSource>(
    reader: &mut LineReader<S>,
    def: &SurfaceDefinition,
    n_points: usize,
    skip_color_data: bool,
) -> Result<()> {
    if def.surface_count > 0 {
        skip_lines(reader, n_points, sum_ints)?;
    }
    if def.edge_count > 0 {
        skip_lines(reader, def.edge_count, |line| decompress(line).chars().count())?;
    }
    if def.is_color_mapped && skip_color_data {
        skip_lines(reader, def.color_count, |line| decompress(line).chars().count())?;
    }
    Ok(())
}

/// Consumes lines until `measure` has accounted for `n` items.
fn skip_lines<S: LineSource>(
    reader: &mut LineReader<S>,
    n: usize,
    measure: impl Fn(&str) -> usize,
) -> Result<()> {
    let mut seen = 0;
    while seen < n {
        let line = reader
            .next_line()?
            .ok_or(JvxlError::UnexpectedEof { expected: n, read: seen })?;
        seen += measure(&line);
    }
    Ok(())
}

/// Reads and decompresses lines until at least `count` characters are available.
fn read_block<S: LineSource>(
    reader: &mut LineReader<S>,
    count: usize,
    kind: &str,
    policy: TruncatedDataPolicy,
) -> Result<String> {
    let mut data = String::new();
    let mut n = 0;
    while n < count {
        let Some(line) = reader.next_line()? else {
            if policy == TruncatedDataPolicy::Error {
                return Err(JvxlError::UnexpectedEof { expected: count, read: n });
            }
            log::error!("end of file reading JVXL {kind} data: {n} of {count} characters");
            break;
        };
        let chunk = decompress(&line);
        n += chunk.chars().count();
        data.push_str(&chunk);
    }
    Ok(data)
}

/// One value of a direct source, picking the selected surface out of interleaved data.
fn next_direct_value<S: LineSource>(
    values: &mut ValueStream<'_, S>,
    header: &VolumeHeader,
    params: &SurfaceParams,
) -> Result<f32> {
    if header.n_surfaces <= 1 || params.block_data {
        return values.next_value();
    }
    for _ in 1..params.file_index {
        values.next_value()?;
    }
    let value = values.next_value()?;
    for _ in params.file_index..header.n_surfaces {
        values.next_value()?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::read_header;
    use proptest::prelude::*;

    const HEADER: &str = "\
title
second
-1 0.0 0.0 0.0 ANGSTROMS
2 1.0 0.0 0.0
2 0.0 1.0 0.0
2 0.0 0.0 1.0
1 1.0 0.0 0.0 0.0
";

    fn load(text: &str, params: &mut SurfaceParams) -> Result<VoxelLoad> {
        let mut reader = LineReader::from_text(text);
        let header = read_header(&mut reader)?;
        read_voxel_data(&mut reader, &header, params, false)
    }

    #[test]
    fn test_surface_runs() {
        let mut runs = SurfaceRuns::new();
        for inside in [false, false, true, true, true, false] {
            runs.push(inside);
        }
        assert_eq!(runs.finish(), " 2 3 1\n");

        let mut runs = SurfaceRuns::new();
        runs.push(true);
        runs.push(false);
        assert_eq!(runs.finish(), " 0 1 1\n");
    }

    #[test]
    fn test_direct_values_and_runs() {
        let text = format!("{HEADER} 1\n0.0 0.0 0.0 0.0\n1.0 1.0\n1.0 1.0\n");
        let mut params = SurfaceParams {
            cutoff: Some(0.5),
            ..SurfaceParams::default()
        };
        let load = load(&text, &mut params).unwrap();
        assert_eq!(load.voxels.get(1, 1, 1), 1.0);
        assert_eq!(load.voxels.get(0, 1, 1), 0.0);
        assert_eq!(load.surface_data, " 4 4\n");
        assert_eq!(load.cutoff, 0.5);
        assert!(load.definition.is_none());
        assert!(load.n_bytes > 0);
    }

    #[test]
    fn test_truncated_data() {
        let text = format!("{HEADER} 1\n1.0 2.0 3.0\n");
        let mut params = SurfaceParams::default();
        let load = load(&text, &mut params).unwrap();
        assert_eq!(load.voxels.get(0, 0, 1), 2.0);
        assert_eq!(load.voxels.get(1, 1, 1), 0.0);

        params.truncated_data = TruncatedDataPolicy::Error;
        match load_err(&text, &mut params) {
            JvxlError::UnexpectedEof { expected, read } => {
                assert_eq!(expected, 8);
                assert_eq!(read, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    fn load_err(text: &str, params: &mut SurfaceParams) -> JvxlError {
        match load(text, params) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_unreadable_lines_are_skipped() {
        let text = format!("{HEADER} 1\n1 2 3 4\ngarbage here\n5 6 7 8\n");
        let load = load(&text, &mut SurfaceParams::default()).unwrap();
        assert_eq!(load.voxels.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_interleaved_surfaces() {
        let text = format!("{HEADER} 2 7 8\n1 -1 2 -2 3 -3 4 -4\n5 -5 6 -6 7 -7 8 -8\n");
        let mut params = SurfaceParams {
            file_index: 2,
            ..SurfaceParams::default()
        };
        let load = load(&text, &mut params).unwrap();
        assert_eq!(load.voxels.get(0, 0, 0), -1.0);
        assert_eq!(load.voxels.get(1, 1, 1), -8.0);
    }

    #[test]
    fn test_block_surfaces_and_index_clamp() {
        let text = format!("{HEADER} 2 7 8\n1 1 1 1 1 1 1 1\n2 2 2 2 2 2 2 2\n");
        let mut params = SurfaceParams {
            file_index: 5,
            block_data: true,
            ..SurfaceParams::default()
        };
        let load = load(&text, &mut params).unwrap();
        assert_eq!(params.file_index, 2);
        assert!(load.voxels.as_slice().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_plane_distances() {
        let text = format!("{HEADER} 1\n");
        let mut reader = LineReader::from_text(&text);
        let header = read_header(&mut reader).unwrap();
        let mut params = SurfaceParams {
            plane: Some(Plane::new(0.0, 0.0, 2.0, -1.0)),
            ..SurfaceParams::default()
        };
        let load = read_voxel_data(&mut reader, &header, &mut params, false).unwrap();
        assert_eq!(load.cutoff, 0.0);
        assert_eq!(load.voxels.get(0, 0, 0), -0.5);
        assert_eq!(load.voxels.get(0, 0, 1), 0.5);
        assert!(load.surface_data.is_empty());
    }

    const JVXL: &str = "\
JVXL test
second
-2 0.0 0.0 0.0 ANGSTROMS
2 1.0 0.0 0.0
2 0.0 1.0 0.0
2 0.0 0.0 1.0
1 1.0 0.0 0.0 0.0
2 2.0 1.0 1.0 1.0
-2 35 90 35 90 JVXL voxel format version 1.0
# first surface
0.5 5 4 -1 0.0 0.0 0.0 0.0
 4 4
ABCD
0.5 8 4 -1 0.0 0.0 0.0 0.0
 0 2 6
Z~4
";

    #[test]
    fn test_jvxl_reconstruction() {
        let mut params = SurfaceParams {
            file_index: 2,
            ..SurfaceParams::default()
        };
        let load = load(JVXL, &mut params).unwrap();
        assert_eq!(load.cutoff, JVXL_CUTOFF);
        assert_eq!(load.voxels.get(0, 0, 0), 1.0);
        assert_eq!(load.voxels.get(0, 0, 1), 1.0);
        assert_eq!(load.voxels.get(0, 1, 0), 0.0);
        assert_eq!(load.surface_data, " 0 2 6\n");
        assert_eq!(load.edge_data, "ZZZZ");
        assert_eq!(load.definition.map(|d| d.surface_count), Some(8));
    }

    #[test]
    fn test_jvxl_color_block() {
        let text = "\
a
b
-1 0.0 0.0 0.0 ANGSTROMS
2 1.0 0.0 0.0
2 0.0 1.0 0.0
2 0.0 0.0 1.0
1 1.0 0.0 0.0 0.0
-1
0.5 5 3 3 -2.0 2.0 -2.0 2.0
 3 5
abc
xyz
";
        let mut reader = LineReader::from_text(text);
        let header = read_header(&mut reader).unwrap();
        let mut params = SurfaceParams::default();
        let (def, colors) = read_jvxl_color_data(&mut reader, &header, &mut params).unwrap();
        assert!(def.is_color_mapped);
        assert_eq!(colors, "xyz");
        assert_eq!(params.mapped_data_range, Some((-2.0, 2.0)));
    }

    proptest! {
        #[test]
        fn runs_cover_every_point(pattern in prop::collection::vec(any::<bool>(), 1..200)) {
            let mut runs = SurfaceRuns::new();
            for &inside in &pattern {
                runs.push(inside);
            }
            let text = runs.finish();
            let lengths: Vec<usize> = text.split_whitespace().map(|t| t.parse().unwrap()).collect();
            prop_assert_eq!(lengths.iter().sum::<usize>(), pattern.len());
            // even runs are outside, odd runs inside
            let mut expanded = Vec::new();
            for (i, &n) in lengths.iter().enumerate() {
                expanded.extend(std::iter::repeat(i % 2 == 1).take(n));
            }
            prop_assert_eq!(expanded, pattern);
        }
    }
}
