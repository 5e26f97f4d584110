//! The surface generator: loads a volume, extracts the surface, colors it and
//! assembles the JVXL text.
//!
//! The generator is driven by [`Property`] values in the order a caller would issue
//! them (`cutoff`, `sign`, `plane`, `readData`, `mapColor`, ...). Loading and coloring
//! are guarded by a three-step state: each of `plane`, `readData` and `mapColor`
//! advances it by one, and `readData` and `mapColor` only run when that step lands
//! on their own state.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::PathBuf;
use std::str::FromStr;

use jvxl_core::codec::FractionCodec;
use jvxl_core::{
    BufReadSource, ColorPhase, ColorScheme, Grid3D, JvxlError, LineReader, MeshData, Palette,
    Plane, Result, SurfaceParams, VolumeData,
};

use crate::color_mapper::{ColorMapper, ValueSource};
use crate::definition::SurfaceDefinition;
use crate::header::{read_header, VolumeHeader};
use crate::jvxl_file::JvxlData;
use crate::marching_cubes::{is_inside, MarchingCubes};
use crate::marching_squares::{contour_type, ContourGrid, ContourVertex};
use crate::voxel_reader::{read_voxel_data, SurfaceRuns, VoxelLoad};

/// Progress of one load-and-convert cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeneratorState {
    Initialized = 0,
    DataRead = 1,
    DataColored = 2,
}

/// Where volumetric data comes from.
pub enum DataSource {
    /// File contents already in memory.
    Text(String),
    Path(PathBuf),
    Reader(Box<dyn BufRead>),
    /// A grid built by the caller; it must hold voxels.
    Volume(VolumeData),
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text({} bytes)", text.len()),
            Self::Path(path) => write!(f, "Path({})", path.display()),
            Self::Reader(_) => f.write_str("Reader"),
            Self::Volume(volume) => write!(f, "Volume({:?})", volume.counts),
        }
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<VolumeData> for DataSource {
    fn from(volume: VolumeData) -> Self {
        Self::Volume(volume)
    }
}

/// Settings and actions accepted by [`SurfaceGenerator::set_property`].
#[derive(Debug)]
pub enum Property {
    /// Resets all parameters and the state.
    Init,
    FileIndex(usize),
    BlockData(bool),
    Title(Vec<String>),
    Cutoff(f32),
    CutoffPositive(f32),
    InsideOut,
    /// Colors by the sign of the data, using absolute values for the cutoff.
    Sign,
    Red(f32),
    /// Sets the value mapped to blue and marks the color range as defined.
    Blue(f32),
    ReverseColor,
    SetColorScheme(String),
    /// Slices the volume with a plane instead of extracting an isosurface.
    Plane(Plane),
    ReadData(DataSource),
    Phase(String),
    MapColor(DataSource),
}

fn invalid(name: &str, message: impl Into<String>) -> JvxlError {
    JvxlError::InvalidProperty {
        name: name.to_string(),
        message: message.into(),
    }
}

fn parse_value<T: FromStr>(name: &str, value: Option<&str>) -> Result<T>
where
    T::Err: fmt::Display,
{
    let text = value.ok_or_else(|| invalid(name, "missing value"))?;
    text.trim()
        .parse()
        .map_err(|e: T::Err| invalid(name, format!("'{text}': {e}")))
}

impl Property {
    /// Builds a property from its protocol name and an optional textual value.
    ///
    /// Titles are split on `|`; `readData` and `mapColor` take a file path.
    pub fn from_name(name: &str, value: Option<&str>) -> Result<Self> {
        let text = |name: &str| {
            value
                .map(str::to_string)
                .ok_or_else(|| invalid(name, "missing value"))
        };
        Ok(match name {
            "init" => Self::Init,
            "fileIndex" => Self::FileIndex(parse_value(name, value)?),
            "blockData" => Self::BlockData(value.map_or(Ok(true), |_| parse_value(name, value))?),
            "title" => Self::Title(
                value
                    .map(|v| v.split('|').map(str::to_string).collect())
                    .unwrap_or_default(),
            ),
            "cutoff" => Self::Cutoff(parse_value(name, value)?),
            "cutoffPositive" => Self::CutoffPositive(parse_value(name, value)?),
            "insideOut" => Self::InsideOut,
            "sign" => Self::Sign,
            "red" => Self::Red(parse_value(name, value)?),
            "blue" => Self::Blue(parse_value(name, value)?),
            "reverseColor" => Self::ReverseColor,
            "setColorScheme" | "colorScheme" => Self::SetColorScheme(text(name)?),
            "plane" => Self::Plane(parse_value(name, value)?),
            "readData" => Self::ReadData(DataSource::Path(text(name)?.into())),
            "phase" => Self::Phase(text(name)?),
            "mapColor" => Self::MapColor(DataSource::Path(text(name)?.into())),
            _ => return Err(JvxlError::UnknownProperty(name.to_string())),
        })
    }
}

/// Outputs available from [`SurfaceGenerator::get_property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyQuery {
    Plane,
    JvxlFileData,
    JvxlFileInfo,
    JvxlSurfaceData,
    VolumeData,
    MeshData,
}

impl FromStr for PropertyQuery {
    type Err = JvxlError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "plane" => Self::Plane,
            "jvxlFileData" => Self::JvxlFileData,
            "jvxlFileInfo" => Self::JvxlFileInfo,
            "jvxlSurfaceData" => Self::JvxlSurfaceData,
            "volumeData" => Self::VolumeData,
            "meshData" => Self::MeshData,
            _ => return Err(JvxlError::UnknownProperty(s.to_string())),
        })
    }
}

/// A value returned by [`SurfaceGenerator::get_property`].
#[derive(Debug, Clone, Copy)]
pub enum PropertyValue<'a> {
    Plane(Plane),
    Text(&'a str),
    Volume(&'a VolumeData),
    Mesh(&'a MeshData),
}

/// A [`PropertyValue`] or JVXL text assembled on demand.
#[derive(Debug, Clone)]
pub enum PropertyOutput<'a> {
    Borrowed(PropertyValue<'a>),
    Text(String),
}

impl PropertyOutput<'_> {
    /// The text of a JVXL output, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Borrowed(PropertyValue::Text(text)) => Some(text),
            Self::Borrowed(_) => None,
        }
    }
}

type SourceReader = LineReader<BufReadSource<Box<dyn BufRead>>>;

enum Input {
    Lines(SourceReader),
    Grid(Grid3D<f32>),
}

/// A data source with its header read.
struct OpenSource {
    header: VolumeHeader,
    input: Input,
}

impl OpenSource {
    fn open(source: DataSource) -> Result<Self> {
        let boxed: Box<dyn BufRead> = match source {
            DataSource::Volume(mut volume) => {
                let voxels = volume
                    .discard_voxels()
                    .ok_or_else(|| JvxlError::State("volume data source has no voxels".into()))?;
                let header = VolumeHeader::from_volume(&volume, "jvxl-rs volume data");
                return Ok(Self {
                    header,
                    input: Input::Grid(voxels),
                });
            }
            DataSource::Text(text) => Box::new(Cursor::new(text)),
            DataSource::Path(path) => {
                log::info!("reading {}", path.display());
                Box::new(BufReader::new(File::open(&path)?))
            }
            DataSource::Reader(reader) => reader,
        };
        let mut reader = LineReader::from_reader(boxed);
        let header = read_header(&mut reader)?;
        log::info!("data file type was determined to be {:?}", header.format);
        Ok(Self {
            header,
            input: Input::Lines(reader),
        })
    }

    fn read_voxels(&mut self, params: &mut SurfaceParams, is_map_data: bool) -> Result<VoxelLoad> {
        match &mut self.input {
            Input::Lines(reader) => read_voxel_data(reader, &self.header, params, is_map_data),
            Input::Grid(grid) => Ok(grid_load(&self.header, grid, params, is_map_data)),
        }
    }
}

/// The in-memory counterpart of [`read_voxel_data`] for caller-built grids.
fn grid_load(
    header: &VolumeHeader,
    grid: &Grid3D<f32>,
    params: &SurfaceParams,
    is_map_data: bool,
) -> VoxelLoad {
    let plane = params.plane.map(Plane::with_valid_normal);
    let (voxels, cutoff) = match plane {
        Some(plane) if !is_map_data => {
            let volume = &header.volume;
            let [nx, ny, nz] = volume.counts;
            let mut distances = Grid3D::new(volume.counts);
            for x in 0..nx {
                for y in 0..ny {
                    for z in 0..nz {
                        distances.set(x, y, z, volume.plane_distance(x, y, z, &plane));
                    }
                }
            }
            (distances, 0.0)
        }
        Some(_) => (grid.clone(), 0.0),
        None => (grid.clone(), params.cutoff_or_default()),
    };
    let surface_data = if is_map_data || plane.is_some() {
        String::new()
    } else {
        let mut runs = SurfaceRuns::new();
        for &value in voxels.as_slice() {
            runs.push(is_inside(value, cutoff, params.is_cutoff_absolute));
        }
        runs.finish()
    };
    VoxelLoad {
        voxels,
        cutoff,
        surface_data,
        n_bytes: 0,
        definition: None,
        edge_data: String::new(),
        color_data: String::new(),
    }
}

/// Where the color mapper takes vertex values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Mesh,
    Volume,
    Contours,
}

/// Min/max of the finite values, or 0/0 when there are none.
fn value_range(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values
        .filter(|v| v.is_finite())
        .fold(None, |range: Option<(f32, f32)>, v| {
            Some(range.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .unwrap_or((0.0, 0.0))
}

/// Generates one surface from volumetric data.
pub struct SurfaceGenerator {
    params: SurfaceParams,
    step: u8,
    palette: Box<dyn Palette>,
    volume: VolumeData,
    mesh: MeshData,
    jvxl: JvxlData,
    contour_vertices: Vec<ContourVertex>,
    contours: Option<ContourGrid>,
    /// Definition of the JVXL surface last read, if the source was JVXL.
    definition: Option<SurfaceDefinition>,
    color_codec: FractionCodec,
    n_bytes: usize,
}

impl Default for SurfaceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceGenerator {
    pub fn new() -> Self {
        Self::with_params(SurfaceParams::default())
    }

    pub fn with_params(params: SurfaceParams) -> Self {
        let palette: Box<dyn Palette> = Box::new(params.color_scheme);
        Self {
            params,
            step: GeneratorState::Initialized as u8,
            palette,
            volume: VolumeData::default(),
            mesh: MeshData::new(),
            jvxl: JvxlData::default(),
            contour_vertices: Vec::new(),
            contours: None,
            definition: None,
            color_codec: FractionCodec::default(),
            n_bytes: 0,
        }
    }

    pub fn state(&self) -> GeneratorState {
        match self.step {
            0 => GeneratorState::Initialized,
            1 => GeneratorState::DataRead,
            _ => GeneratorState::DataColored,
        }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SurfaceParams {
        &mut self.params
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn volume(&self) -> &VolumeData {
        &self.volume
    }

    pub fn jvxl_data(&self) -> &JvxlData {
        &self.jvxl
    }

    /// Replaces the palette used for value coloring.
    pub fn set_palette(&mut self, palette: Box<dyn Palette>) {
        self.palette = palette;
    }

    pub fn set_property(&mut self, property: Property) -> Result<()> {
        let params = &mut self.params;
        match property {
            Property::Init => self.initialize(),
            Property::FileIndex(index) => params.file_index = index.max(1),
            Property::BlockData(block) => params.block_data = block,
            Property::Title(title) => params.title = title,
            Property::Cutoff(cutoff) => {
                params.cutoff = Some(cutoff);
                params.is_positive_only = false;
            }
            Property::CutoffPositive(cutoff) => {
                params.cutoff = Some(cutoff);
                params.is_positive_only = true;
            }
            Property::InsideOut => params.inside_out = true,
            Property::Sign => {
                params.is_cutoff_absolute = true;
                params.color_by_sign = true;
            }
            Property::Red(value) => params.value_mapped_to_red = value,
            Property::Blue(value) => {
                params.value_mapped_to_blue = value;
                params.range_defined = true;
            }
            Property::ReverseColor => params.is_color_reversed = true,
            Property::SetColorScheme(name) => {
                let scheme: ColorScheme = name.parse()?;
                params.color_scheme = scheme;
                self.palette = Box::new(scheme);
            }
            Property::Plane(plane) => {
                params.plane = Some(plane);
                params.is_contoured = true;
                self.step = self.step.saturating_add(1);
            }
            Property::ReadData(source) => self.read_data(source)?,
            Property::Phase(name) => {
                params.is_cutoff_absolute = true;
                params.color_by_sign = true;
                params.color_phase = Some(ColorPhase::from_name_lossy(&name));
            }
            Property::MapColor(source) => self.map_color(source)?,
        }
        Ok(())
    }

    /// `index` is the surface count written into the JVXL header.
    pub fn get_property(&self, query: PropertyQuery, index: usize) -> Option<PropertyOutput<'_>> {
        let has_surface = self.jvxl.surface_data.is_some();
        Some(match query {
            PropertyQuery::Plane => PropertyOutput::Borrowed(PropertyValue::Plane(self.jvxl.plane?)),
            PropertyQuery::JvxlFileData if has_surface => {
                PropertyOutput::Text(self.jvxl.jvxl_file(true, index))
            }
            PropertyQuery::JvxlSurfaceData if has_surface => {
                PropertyOutput::Text(self.jvxl.jvxl_file(false, 1))
            }
            PropertyQuery::JvxlFileData | PropertyQuery::JvxlSurfaceData => return None,
            PropertyQuery::JvxlFileInfo => {
                PropertyOutput::Borrowed(PropertyValue::Text(&self.jvxl.info_line))
            }
            PropertyQuery::VolumeData => PropertyOutput::Borrowed(PropertyValue::Volume(&self.volume)),
            PropertyQuery::MeshData => PropertyOutput::Borrowed(PropertyValue::Mesh(&self.mesh)),
        })
    }

    /// The complete JVXL file of the current surface.
    pub fn jvxl_file(&self) -> Option<String> {
        self.get_property(PropertyQuery::JvxlFileData, 1)
            .and_then(|out| out.as_text().map(str::to_string))
    }

    fn initialize(&mut self) {
        self.params = SurfaceParams::default();
        self.palette = Box::new(self.params.color_scheme);
        self.step = GeneratorState::Initialized as u8;
    }

    /// Steps the state; false when the new state is not `target`.
    fn advance(&mut self, target: GeneratorState, action: &str) -> bool {
        self.step = self.step.saturating_add(1);
        if self.step == target as u8 {
            return true;
        }
        log::info!("{action} skipped: generator is past {target:?}");
        false
    }

    fn read_data(&mut self, source: DataSource) -> Result<()> {
        if !self.advance(GeneratorState::DataRead, "readData") {
            return Ok(());
        }
        let mut open = OpenSource::open(source)?;
        if self.params.color_by_sign {
            self.params.is_bicolor_map = true;
        }
        self.create_isosurface(&mut open)?;
        self.jvxl.message = if self.jvxl.is_color_mapped {
            "mapped".to_string()
        } else {
            String::new()
        };
        if self.params.color_by_sign && !self.jvxl.is_color_mapped {
            self.step = GeneratorState::DataColored as u8;
            self.apply_color_scale(ValueKind::Mesh);
        }
        self.update_info();
        self.discard_temp_data(false);
        self.params.mapped_data_range = None;
        Ok(())
    }

    fn map_color(&mut self, source: DataSource) -> Result<()> {
        if !self.advance(GeneratorState::DataColored, "mapColor") {
            return Ok(());
        }
        let mut open = OpenSource::open(source)?;
        if self.params.plane.is_some() {
            self.create_isosurface(&mut open)?;
            let load = open.read_voxels(&mut self.params, true)?;
            self.volume.set_voxels(load.voxels)?;
            self.color_isosurface()?;
        } else {
            let load = open.read_voxels(&mut self.params, true)?;
            match load.definition.filter(|d| d.is_color_mapped) {
                Some(def) => self.read_color_data(&load.color_data, &def)?,
                None if open.header.is_jvxl() => {
                    log::error!(
                        "JVXL data holds the colors of one surface only and cannot be mapped onto another"
                    );
                    return Ok(());
                }
                None => {
                    let geometry = &open.header.volume;
                    self.volume = VolumeData::new(geometry.origin, geometry.vectors, geometry.counts);
                    self.volume.set_voxels(load.voxels)?;
                    self.color_isosurface()?;
                }
            }
        }
        self.update_info();
        self.discard_temp_data(true);
        Ok(())
    }

    fn reset_isosurface(&mut self) {
        self.mesh.clear();
        self.contour_vertices.clear();
        self.contours = None;
        self.definition = None;
        self.jvxl = JvxlData::default();
    }

    /// Reads the surface data and runs marching cubes over it.
    fn create_isosurface(&mut self, open: &mut OpenSource) -> Result<()> {
        self.reset_isosurface();
        let VoxelLoad {
            voxels,
            cutoff,
            surface_data,
            n_bytes,
            definition,
            edge_data,
            color_data,
        } = open.read_voxels(&mut self.params, false)?;
        let header = &open.header;
        self.n_bytes = n_bytes;
        let geometry = &header.volume;
        self.volume = VolumeData::new(geometry.origin, geometry.vectors, geometry.counts);
        self.volume.set_voxels(voxels)?;

        let plane = self.params.plane.map(Plane::with_valid_normal);
        let contour_axis = match plane {
            Some(plane) => Some(contour_type(&plane, &self.volume.vectors)),
            None if self.params.is_contoured => Some(2),
            None => None,
        };
        let output = {
            let mut mc = MarchingCubes::new(&self.volume, cutoff)
                .cutoff_absolute(self.params.is_cutoff_absolute)
                .inside_out(self.params.inside_out)
                .contour_type(contour_axis)
                .edge_codec(header.edge_codec);
            if header.is_jvxl() && plane.is_none() {
                mc = mc.jvxl_edges(&edge_data);
            }
            mc.generate(&mut self.mesh)?
        };
        log::info!(
            "surface: {} vertices, {} triangles, {} contour vertices",
            self.mesh.vertex_count(),
            self.mesh.triangle_count(),
            output.contour_vertices.len()
        );
        self.contour_vertices = output.contour_vertices;
        self.color_codec = header.color_codec;
        self.definition = definition.clone();

        let def = definition.as_ref();
        self.jvxl = JvxlData {
            file_header: header.file_header.clone(),
            surface_data: Some(surface_data),
            edge_data: output.edge_data,
            cutoff: def.map_or(cutoff, |d| d.cutoff),
            plane,
            is_contoured: self.params.is_contoured,
            n_contours: if self.params.is_contoured {
                self.params.contour_count()
            } else {
                0
            },
            is_bicolor_map: self.params.is_bicolor_map,
            is_color_mapped: def.is_some_and(|d| d.is_color_mapped),
            is_precision_color: def.is_some_and(|d| d.is_precision_color),
            edge_codec: header.edge_codec,
            color_codec: header.color_codec,
            n_edges: output.edge_count,
            title: self.params.title.clone(),
            ..JvxlData::default()
        };

        if let Some(def) = definition.filter(|d| d.is_color_mapped) {
            self.read_color_data(&color_data, &def)?;
        }
        Ok(())
    }

    /// Restores vertex values and colors from a JVXL color block.
    fn read_color_data(&mut self, data: &str, def: &SurfaceDefinition) -> Result<()> {
        let count = if self.params.is_contoured {
            self.contour_vertices.len()
        } else {
            self.mesh.vertex_count()
        };
        let values = ColorMapper::new(self.palette.as_ref(), self.color_codec).read_color_data(
            data,
            count,
            &self.params,
            def.is_precision_color,
        );
        log::info!(
            "JVXL read {} color values, precision {}",
            values.len(),
            def.is_precision_color
        );

        if self.params.is_contoured {
            for (vertex, value) in self.contour_vertices.iter_mut().zip(&values) {
                vertex.value = *value;
            }
            self.params
                .set_map_ranges(|| value_range(values.iter().copied()));
            self.generate_contour_data(true)?;
            self.apply_color_scale(ValueKind::Contours);
        } else {
            let (min, max) = self
                .params
                .set_map_ranges(|| value_range(values.iter().copied()));
            let mapper = ColorMapper::new(self.palette.as_ref(), self.color_codec);
            let colors = mapper.apply_color_scale(&values, &self.params);
            self.mesh.set_colors(colors);
            for (stored, value) in self.mesh.values.iter_mut().zip(&values) {
                *stored = *value;
            }
            self.jvxl.color_data = format!("{}\n", data.trim_end());
            self.jvxl.is_color_mapped = true;
            self.jvxl.is_precision_color = def.is_precision_color;
            self.jvxl.mapped_data_range = (min, max);
            self.jvxl.value_mapped_to_red = self.params.value_mapped_to_red;
            self.jvxl.value_mapped_to_blue = self.params.value_mapped_to_blue;
        }
        Ok(())
    }

    /// Colors the surface from mapped data, contouring first when asked to.
    fn color_isosurface(&mut self) -> Result<()> {
        let is_2d_contour = self
            .definition
            .as_ref()
            .is_some_and(SurfaceDefinition::is_2d_contour);
        if self.params.is_contoured && !(is_2d_contour || self.params.plane.is_some()) {
            log::error!("cannot contour this type of data");
            return Ok(());
        }
        if self.params.is_contoured {
            let flat_z = self.params.plane.is_none();
            let volume = &self.volume;
            let vertices = &self.contour_vertices;
            self.params.set_map_ranges(|| {
                value_range(
                    vertices
                        .iter()
                        .map(|v| volume.interpolated_value(v.position, flat_z).unwrap_or(f32::NAN)),
                )
            });
            self.generate_contour_data(is_2d_contour)?;
        }
        let kind = if self.params.is_bicolor_map && !self.params.is_contoured {
            ValueKind::Mesh
        } else if is_2d_contour {
            ValueKind::Contours
        } else {
            ValueKind::Volume
        };
        self.apply_color_scale(kind);
        self.jvxl.message = format!(
            "mapped: min = {}; max = {}",
            self.params.value_mapped_to_red, self.params.value_mapped_to_blue
        );
        Ok(())
    }

    /// Builds the contour grid from the contour vertices and fills the bands.
    fn generate_contour_data(&mut self, have_values: bool) -> Result<()> {
        let n_contours = self.params.contour_count();
        log::info!("generating {n_contours} contours");
        let plane = self.params.plane.map(Plane::with_valid_normal);
        let mut grid = ContourGrid::new(&self.volume, plane.as_ref(), &self.contour_vertices, n_contours);
        grid.load_pixel_data(&mut self.contour_vertices, &mut self.volume, &mut self.mesh, have_values)?;
        grid.create_contours(
            &mut self.mesh,
            self.params.value_mapped_to_red,
            self.params.value_mapped_to_blue,
        );
        grid.triangulate(&mut self.mesh, self.params.this_contour);
        self.jvxl.n_contours = n_contours;
        self.contours = Some(grid);
        Ok(())
    }

    fn apply_color_scale(&mut self, kind: ValueKind) {
        let last_vertex = if self.contour_vertices.is_empty() {
            self.mesh.vertex_count()
        } else {
            self.contour_vertices.len()
        };
        let is_precision = self.definition.as_ref().is_some_and(|d| d.is_precision_color)
            || self.params.is_contoured;
        let source = match (kind, &self.contours) {
            (ValueKind::Contours, Some(grid)) => ValueSource::Contours(grid),
            (ValueKind::Volume, _) if self.volume.voxels().is_some() => ValueSource::Volume(&self.volume),
            _ => ValueSource::Mesh,
        };
        let mapper = ColorMapper::new(self.palette.as_ref(), self.color_codec);
        let color = mapper.color_isosurface(&mut self.mesh, source, &mut self.params, last_vertex, is_precision);
        self.jvxl.color_data = format!("{}\n", color.data);
        self.jvxl.is_color_mapped = true;
        self.jvxl.is_precision_color = color.is_precision;
        self.jvxl.mapped_data_range = color.data_range;
        (self.jvxl.value_mapped_to_red, self.jvxl.value_mapped_to_blue) = color.red_blue;
    }

    fn update_info(&mut self) {
        self.jvxl.update_info(&self.params.title, self.n_bytes);
    }

    /// Releases the voxels; `all` also drops the contour data.
    pub fn discard_temp_data(&mut self, all: bool) {
        self.volume.discard_voxels();
        if all {
            self.contours = None;
            self.contour_vertices.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// A CUBE file in Angstroms with unit spacing and one atom.
    fn cube_text(counts: [usize; 3], f: impl Fn(usize, usize, usize) -> f32) -> String {
        let mut text = String::from("test cube\nvalues\n1 0.0 0.0 0.0 ANGSTROMS\n");
        text.push_str(&format!("{} 1.0 0.0 0.0\n", counts[0]));
        text.push_str(&format!("{} 0.0 1.0 0.0\n", counts[1]));
        text.push_str(&format!("{} 0.0 0.0 1.0\n", counts[2]));
        text.push_str("6 6.0 0.0 0.0 0.0\n");
        for x in 0..counts[0] {
            for y in 0..counts[1] {
                let row: Vec<String> = (0..counts[2]).map(|z| format!("{:.5}", f(x, y, z))).collect();
                text.push_str(&row.join(" "));
                text.push('\n');
            }
        }
        text
    }

    fn sphere(x: usize, y: usize, z: usize) -> f32 {
        let p = Vec3::new(x as f32, y as f32, z as f32) - Vec3::splat(3.0);
        (-p.length_squared() / 4.0).exp()
    }

    #[test]
    fn test_two_by_two_cube() {
        let text = cube_text([2, 2, 2], |_, _, z| z as f32);
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::Cutoff(0.5)).unwrap();
        generator.set_property(Property::ReadData(DataSource::Text(text))).unwrap();
        assert_eq!(generator.state(), GeneratorState::DataRead);
        assert_eq!(generator.mesh().triangle_count(), 2);
        assert!(generator.mesh().vertices.iter().all(|v| (v.z - 0.5).abs() < 1e-5));
        assert!(generator.volume().voxels().is_none());
        let file = generator.jvxl_file().unwrap();
        assert!(file.starts_with("JVXL test cube\n"));
        assert!(file.contains("JVXL voxel format version 1.0"));
    }

    #[test]
    fn test_state_guard() {
        let text = cube_text([2, 2, 2], |_, _, z| z as f32);
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::ReadData(DataSource::Text(text.clone()))).unwrap();
        let triangles = generator.mesh().triangle_count();
        generator.set_property(Property::ReadData(DataSource::Text(text))).unwrap();
        assert_eq!(generator.state(), GeneratorState::DataColored);
        assert_eq!(generator.mesh().triangle_count(), triangles);
        generator.set_property(Property::Init).unwrap();
        assert_eq!(generator.state(), GeneratorState::Initialized);
    }

    #[test]
    fn test_jvxl_round_trip() {
        let text = cube_text([7, 7, 7], sphere);
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::Cutoff(0.3)).unwrap();
        generator.set_property(Property::ReadData(DataSource::Text(text))).unwrap();
        let original = generator.mesh().clone();
        assert!(original.triangle_count() > 0);
        let file = generator.jvxl_file().unwrap();

        let mut reread = SurfaceGenerator::new();
        reread.set_property(Property::ReadData(DataSource::Text(file))).unwrap();
        let mesh = reread.mesh();
        assert_eq!(mesh.triangle_count(), original.triangle_count());
        assert_eq!(mesh.vertex_count(), original.vertex_count());
        for (a, b) in mesh.vertices.iter().zip(&original.vertices) {
            assert!(a.distance(*b) < 0.02, "{a:?} vs {b:?}");
        }
        assert_eq!(reread.jvxl_data().edge_data, generator.jvxl_data().edge_data);
    }

    #[test]
    fn test_sign_colors_both_lobes() {
        let text = cube_text([4, 4, 4], |x, _, _| x as f32 - 1.5);
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::Cutoff(1.0)).unwrap();
        generator.set_property(Property::Sign).unwrap();
        generator.set_property(Property::ReadData(DataSource::Text(text))).unwrap();
        assert_eq!(generator.state(), GeneratorState::DataColored);
        let params = generator.params();
        let mesh = generator.mesh();
        assert_eq!(mesh.colors.len(), mesh.vertex_count());
        assert!(mesh.colors.contains(&params.color_negative));
        assert!(mesh.colors.contains(&params.color_positive));
        assert!(generator.jvxl_data().definition_line.contains(" -"));
    }

    #[test]
    fn test_plane_contours_and_readback() {
        let text = cube_text([5, 5, 5], |x, y, _| (x + y) as f32);
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::Plane(Plane::new(0.0, 0.0, 1.0, -1.5))).unwrap();
        assert_eq!(generator.state(), GeneratorState::DataRead);
        generator.set_property(Property::MapColor(DataSource::Text(text))).unwrap();
        assert_eq!(generator.state(), GeneratorState::DataColored);
        let mesh = generator.mesh().clone();
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.colors.len(), mesh.vertex_count());
        assert!(mesh.vertices.iter().all(|v| (v.z - 1.5).abs() < 1e-4));
        let data = generator.jvxl_data();
        let (min, max) = data.mapped_data_range;
        assert!((min - 0.0).abs() < 1e-4 && (max - 8.0).abs() < 1e-4);
        assert!(data.is_precision_color);
        assert!(data.definition_line.contains(" -1 -2 -"));
        assert!(data.definition_line.contains(" 0.0 0.0 1.0 -1.5 11 "));

        let file = generator.jvxl_file().unwrap();
        let mut reread = SurfaceGenerator::new();
        reread.set_property(Property::ReadData(DataSource::Text(file))).unwrap();
        assert_eq!(reread.jvxl_data().plane, Some(Plane::new(0.0, 0.0, 1.0, -1.5)));
        assert!(reread.mesh().triangle_count() > 0);
        assert_eq!(reread.mesh().colors.len(), reread.mesh().vertex_count());
    }

    #[test]
    fn test_volume_source() {
        let mut volume = VolumeData::new(Vec3::ZERO, [Vec3::X, Vec3::Y, Vec3::Z], [3, 3, 3]);
        let mut grid = Grid3D::new([3, 3, 3]);
        grid.set(1, 1, 1, 1.0);
        volume.set_voxels(grid).unwrap();
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::Cutoff(0.5)).unwrap();
        generator.set_property(Property::ReadData(volume.into())).unwrap();
        assert_eq!(generator.mesh().triangle_count(), 8);
        assert_eq!(generator.jvxl_data().surface_data.as_deref(), Some(" 13 1 13\n"));
    }

    #[test]
    fn test_map_color_from_cube() {
        let text = cube_text([6, 6, 6], sphere);
        let map = cube_text([6, 6, 6], |x, _, _| x as f32);
        let mut generator = SurfaceGenerator::new();
        generator.set_property(Property::Cutoff(0.3)).unwrap();
        generator.set_property(Property::SetColorScheme("rwb".into())).unwrap();
        generator.set_property(Property::ReadData(DataSource::Text(text))).unwrap();
        generator.set_property(Property::MapColor(DataSource::Text(map))).unwrap();
        let data = generator.jvxl_data();
        assert!(data.is_color_mapped);
        assert!(!data.is_precision_color);
        assert_eq!(data.color_data.len(), generator.mesh().vertex_count() + 1);
        assert!(data.message.starts_with("mapped: min = "));
        let (min, max) = data.mapped_data_range;
        assert!(min > 0.5 && max <= 5.0);
    }

    #[test]
    fn test_property_names() {
        assert!(matches!(Property::from_name("cutoff", Some("0.1")).unwrap(), Property::Cutoff(c) if c == 0.1));
        assert!(matches!(Property::from_name("sign", None).unwrap(), Property::Sign));
        assert!(matches!(
            Property::from_name("plane", Some("{0 0 1 0}")).unwrap(),
            Property::Plane(p) if p == Plane::new(0.0, 0.0, 1.0, 0.0)
        ));
        assert!(matches!(
            Property::from_name("title", Some("a|b")).unwrap(),
            Property::Title(t) if t == ["a", "b"]
        ));
        assert!(matches!(
            Property::from_name("bogus", None),
            Err(JvxlError::UnknownProperty(_))
        ));
        assert!(matches!(
            Property::from_name("cutoff", Some("x")),
            Err(JvxlError::InvalidProperty { .. })
        ));
        assert_eq!("meshData".parse::<PropertyQuery>().unwrap(), PropertyQuery::MeshData);
        assert!(SurfaceGenerator::new()
            .set_property(Property::SetColorScheme("nope".into()))
            .is_err());
    }

    #[test]
    fn test_get_property() {
        let mut generator = SurfaceGenerator::new();
        assert!(generator.get_property(PropertyQuery::JvxlFileData, 1).is_none());
        assert!(generator.get_property(PropertyQuery::Plane, 0).is_none());
        let text = cube_text([2, 2, 2], |_, _, z| z as f32);
        generator.set_property(Property::ReadData(DataSource::Text(text))).unwrap();
        let info = generator.get_property(PropertyQuery::JvxlFileInfo, 0).unwrap();
        assert!(info.as_text().unwrap().starts_with("# nSurfaceData"));
        let body = generator.get_property(PropertyQuery::JvxlSurfaceData, 0).unwrap();
        assert!(!body.as_text().unwrap().starts_with("JVXL"));
        assert!(matches!(
            generator.get_property(PropertyQuery::MeshData, 0),
            Some(PropertyOutput::Borrowed(PropertyValue::Mesh(m))) if m.triangle_count() == 2
        ));
    }
}
