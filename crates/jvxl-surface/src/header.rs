//! Volumetric file headers: Gaussian CUBE, APBS OpenDX and JVXL.
//!
//! Every format is reduced to one canonical JVXL-style header: comment lines, two
//! title lines, a negative atom count with the origin, three voxel vector lines and
//! the atom lines. The text is kept so it can be written back unchanged.

use glam::Vec3;
use jvxl_core::codec::FractionCodec;
use jvxl_core::{JvxlError, LineReader, LineSource, Result, VolumeData};
use serde::Serialize;

use crate::apbs;
use crate::text::{format_float, Tokens};

/// Length unit conversion for grids given in Bohr.
pub const ANGSTROMS_PER_BOHR: f32 = 0.529_177_2;

/// Kind of file a header was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Cube,
    ApbsDx,
    Jvxl,
}

/// Everything known about a volumetric file once its header has been read.
#[derive(Debug, Clone)]
pub struct VolumeHeader {
    pub format: SourceFormat,
    /// Leading `#` and blank lines.
    pub comments: Vec<String>,
    pub titles: [String; 2],
    /// Canonical header text, ready to be written at the top of a JVXL file.
    pub file_header: String,
    /// Lattice description in Angstroms, without voxel values.
    pub volume: VolumeData,
    pub atom_count: usize,
    pub is_angstroms: bool,
    /// Number of surfaces (JVXL) or interleaved values per grid point (CUBE).
    pub n_surfaces: usize,
    pub edge_codec: FractionCodec,
    pub color_codec: FractionCodec,
}

impl VolumeHeader {
    pub fn is_jvxl(&self) -> bool {
        self.format == SourceFormat::Jvxl
    }

    pub fn point_count(&self) -> usize {
        self.volume.point_count()
    }

    /// Canonical header for a grid that did not come from a file. Voxels are not copied.
    pub fn from_volume(volume: &VolumeData, title: &str) -> Self {
        let titles = [title.to_string(), "volume data".to_string()];
        let mut file_header = String::new();
        for line in &titles {
            push_line(&mut file_header, line);
        }
        let o = volume.origin;
        push_line(
            &mut file_header,
            &format!("-2 {} {} {} ANGSTROMS", format_float(o.x), format_float(o.y), format_float(o.z)),
        );
        for (count, v) in volume.counts.iter().zip(&volume.vectors) {
            push_line(
                &mut file_header,
                &format!("{count} {} {} {}", format_float(v.x), format_float(v.y), format_float(v.z)),
            );
        }
        file_header.push_str(&placeholder_atoms(volume));
        Self {
            format: SourceFormat::Cube,
            comments: Vec::new(),
            titles,
            file_header,
            volume: VolumeData::new(volume.origin, volume.vectors, volume.counts),
            atom_count: 0,
            is_angstroms: true,
            n_surfaces: 1,
            edge_codec: FractionCodec::default(),
            color_codec: FractionCodec::default(),
        }
    }
}

/// Reads a header, leaving `reader` positioned at the first data line.
pub fn read_header<S: LineSource>(reader: &mut LineReader<S>) -> Result<VolumeHeader> {
    let mut file_header = String::new();
    let comments = read_comments(reader, &mut file_header)?;
    let is_apbs = reader.peek_line()?.is_some_and(apbs::is_apbs_line);
    if is_apbs {
        return apbs::read_apbs_header(reader, comments, file_header);
    }

    let titles = [read_title(reader, 1)?, read_title(reader, 2)?];
    for title in &titles {
        push_line(&mut file_header, title);
    }

    read_comments(reader, &mut file_header)?;
    let atom_line = reader
        .next_line()?
        .ok_or_else(|| JvxlError::header(reader.line_number() + 1, "missing atom count line"))?;
    let line_number = reader.line_number();
    let trimmed = atom_line.trim_start();
    let mut tokens = Tokens::new(trimmed);
    let first = tokens
        .next_token()
        .ok_or_else(|| JvxlError::header(line_number, "empty atom count line"))?;
    let signed_count: i32 = first.parse().unwrap_or(0);
    let rest = &trimmed[first.len()..];
    let is_angstroms = rest.contains("ANGSTROMS");
    let origin = read_vec3(&mut tokens)
        .ok_or_else(|| JvxlError::header(line_number, "atom count line has no origin"))?;
    let atom_count = signed_count.unsigned_abs() as usize;
    let has_extra_line = signed_count < 0;
    let jvxl_atoms = if atom_count == 0 {
        -2
    } else {
        -(atom_count as i64)
    };
    push_line(&mut file_header, &format!("{jvxl_atoms}{rest}"));

    let scale = if is_angstroms { 1.0 } else { ANGSTROMS_PER_BOHR };
    let mut counts = [0usize; 3];
    let mut vectors = [Vec3::ZERO; 3];
    for i in 0..3 {
        let line = reader.next_line()?.ok_or_else(|| {
            JvxlError::header(reader.line_number() + 1, format!("missing voxel vector line {}", i + 1))
        })?;
        let (count, vector) = parse_vector_line(&line, reader.line_number())?;
        counts[i] = count;
        vectors[i] = vector * scale;
        push_line(&mut file_header, &line);
    }
    let volume = VolumeData::new(origin * scale, vectors, counts);
    volume.check_orthogonality();
    log::info!(
        "voxel grid origin {:?} counts {:?} vector lengths {:?}{}",
        volume.origin,
        volume.counts,
        volume.vector_lengths(),
        if is_angstroms { " (Angstroms)" } else { " (Bohr converted to Angstroms)" }
    );

    for i in 0..atom_count {
        let line = reader.next_line()?.ok_or_else(|| {
            JvxlError::header(
                reader.line_number() + 1,
                format!("expected {atom_count} atom lines, found {i}"),
            )
        })?;
        push_line(&mut file_header, &line);
    }
    if atom_count == 0 {
        file_header.push_str(&placeholder_atoms(&volume));
    }

    let mut header = VolumeHeader {
        format: SourceFormat::Cube,
        comments,
        titles,
        file_header,
        volume,
        atom_count,
        is_angstroms,
        n_surfaces: 1,
        edge_codec: FractionCodec::default(),
        color_codec: FractionCodec::default(),
    };
    if has_extra_line {
        let line = reader.next_line()?.ok_or_else(|| {
            JvxlError::header(reader.line_number() + 1, "missing surface control line")
        })?;
        read_extra_line(&mut header, &line, reader.line_number())?;
    }
    Ok(header)
}

/// Consumes blank and `#` lines, appending them to `file_header`.
fn read_comments<S: LineSource>(
    reader: &mut LineReader<S>,
    file_header: &mut String,
) -> Result<Vec<String>> {
    let mut comments = Vec::new();
    while let Some(line) = reader.peek_line()? {
        let trimmed = line.trim_start();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            break;
        }
        if let Some(line) = reader.next_line()? {
            push_line(file_header, &line);
            comments.push(line);
        }
    }
    Ok(comments)
}

fn read_title<S: LineSource>(reader: &mut LineReader<S>, n: usize) -> Result<String> {
    Ok(match reader.next_line()? {
        Some(line) if !line.trim().is_empty() => line,
        _ => format!("Line {n}"),
    })
}

pub(crate) fn push_line(text: &mut String, line: &str) {
    text.push_str(line);
    text.push('\n');
}

pub(crate) fn read_vec3(tokens: &mut Tokens<'_>) -> Option<Vec3> {
    Some(Vec3::new(
        tokens.next_float()?,
        tokens.next_float()?,
        tokens.next_float()?,
    ))
}

/// Parses `count vx vy vz`.
fn parse_vector_line(line: &str, line_number: usize) -> Result<(usize, Vec3)> {
    let mut tokens = Tokens::new(line);
    let count = tokens
        .next_int()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| JvxlError::header(line_number, format!("invalid voxel count in '{line}'")))?;
    let vector = read_vec3(&mut tokens).ok_or_else(|| {
        JvxlError::header(line_number, format!("voxel vector needs three components: '{line}'"))
    })?;
    Ok((count, vector))
}

/// The two atoms written when a file has none: one at the origin, one at the far corner.
pub(crate) fn placeholder_atoms(volume: &VolumeData) -> String {
    let origin = volume.origin;
    let corner = volume
        .vectors
        .iter()
        .zip(volume.counts)
        .fold(origin, |pt, (v, n)| pt + *v * n.saturating_sub(1) as f32);
    log::info!("no atoms in file; adding placeholder atoms for the JVXL header");
    format!(
        "1 1.0 {} {} {} //BOGUS H ATOM ADDED FOR JVXL FORMAT\n2 2.0 {} {} {} //BOGUS He ATOM ADDED FOR JVXL FORMAT\n",
        format_float(origin.x),
        format_float(origin.y),
        format_float(origin.z),
        format_float(corner.x),
        format_float(corner.y),
        format_float(corner.z),
    )
}

/// The line after the atoms: `-n [edgeBase edgeRange [colorBase colorRange]]` marks
/// a JVXL file with `n` surfaces, a non-negative first value is a CUBE surface count.
fn read_extra_line(header: &mut VolumeHeader, line: &str, line_number: usize) -> Result<()> {
    log::info!("reading extra orbital/JVXL information line: {line}");
    let mut tokens = Tokens::new(line);
    let n = tokens
        .next_int()
        .ok_or_else(|| JvxlError::header(line_number, format!("unreadable surface count in '{line}'")))?;
    if n >= 0 {
        header.n_surfaces = (n as usize).max(1);
        return Ok(());
    }
    header.format = SourceFormat::Jvxl;
    header.n_surfaces = n.unsigned_abs() as usize;
    log::info!("jvxl file surfaces: {}", header.n_surfaces);
    header.edge_codec = read_codec(&mut tokens, "edge")?;
    header.color_codec = read_codec(&mut tokens, "color")?;
    Ok(())
}

fn read_codec(tokens: &mut Tokens<'_>, kind: &str) -> Result<FractionCodec> {
    let (Some(base), Some(range)) = (tokens.next_int(), tokens.next_int()) else {
        log::info!("using default {kind} fraction base and range");
        return Ok(FractionCodec::default());
    };
    let to_u8 = |v: i32| {
        u8::try_from(v).map_err(|_| JvxlError::Codec(format!("{kind} fraction parameter {v} out of range")))
    };
    FractionCodec::new(to_u8(base)?, to_u8(range)?)
}
