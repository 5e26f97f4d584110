//! APBS OpenDX potential maps.
//!
//! ```text
//! object 1 class gridpositions counts nx ny nz
//! origin ox oy oz
//! delta hx 0.0 0.0
//! delta 0.0 hy 0.0
//! delta 0.0 0.0 hz
//! object 2 class gridconnections counts nx ny nz
//! object 3 class array type double rank 0 items n data follows
//! ```
//!
//! The values that follow are x-major like CUBE data, three per line.

use glam::Vec3;
use jvxl_core::codec::FractionCodec;
use jvxl_core::{JvxlError, LineReader, LineSource, Result, VolumeData};

use crate::header::{placeholder_atoms, push_line, read_vec3, SourceFormat, VolumeHeader};
use crate::text::{format_float, Tokens};

const GRID_POSITIONS: &str = "object 1 class gridpositions counts";
const GRID_CONNECTIONS: &str = "object 2 class gridconnections counts";
const DATA_OBJECT: &str = "object 3";

pub(crate) fn is_apbs_line(line: &str) -> bool {
    line.trim_start().starts_with(GRID_POSITIONS)
}

/// Reads the DX header after its leading comments and converts it to the canonical form.
pub(crate) fn read_apbs_header<S: LineSource>(
    reader: &mut LineReader<S>,
    comments: Vec<String>,
    mut file_header: String,
) -> Result<VolumeHeader> {
    let object_line = expect_line(reader, GRID_POSITIONS)?;
    let counts = read_counts(&object_line[GRID_POSITIONS.len()..], reader.line_number())?;
    let titles = [
        "APBS OpenDx DATA".to_string(),
        format!("{object_line} see http://apbs.sourceforge.net"),
    ];
    for title in &titles {
        push_line(&mut file_header, title);
    }

    let origin_line = expect_line(reader, "origin")?;
    let origin = read_vec3(&mut Tokens::new(&origin_line["origin".len()..]))
        .ok_or_else(|| JvxlError::header(reader.line_number(), "origin needs three components"))?;
    let mut vectors = [Vec3::ZERO; 3];
    for vector in &mut vectors {
        let line = expect_line(reader, "delta")?;
        *vector = read_vec3(&mut Tokens::new(&line["delta".len()..]))
            .ok_or_else(|| JvxlError::header(reader.line_number(), "delta needs three components"))?;
    }

    let connections = expect_line(reader, GRID_CONNECTIONS)?;
    let connection_counts =
        read_counts(&connections[GRID_CONNECTIONS.len()..], reader.line_number())?;
    if connection_counts != counts {
        log::warn!("APBS grid connections {connection_counts:?} differ from grid positions {counts:?}");
    }
    expect_line(reader, DATA_OBJECT)?;

    push_line(
        &mut file_header,
        &format!(
            "-2 {} {} {} ANGSTROMS",
            format_float(origin.x),
            format_float(origin.y),
            format_float(origin.z)
        ),
    );
    for (count, v) in counts.iter().zip(&vectors) {
        push_line(
            &mut file_header,
            &format!("{count} {} {} {}", format_float(v.x), format_float(v.y), format_float(v.z)),
        );
    }
    let volume = VolumeData::new(origin, vectors, counts);
    volume.check_orthogonality();
    file_header.push_str(&placeholder_atoms(&volume));
    log::info!("APBS OpenDX grid origin {origin:?} counts {counts:?}");

    Ok(VolumeHeader {
        format: SourceFormat::ApbsDx,
        comments,
        titles,
        file_header,
        volume,
        atom_count: 0,
        is_angstroms: true,
        n_surfaces: 1,
        edge_codec: FractionCodec::default(),
        color_codec: FractionCodec::default(),
    })
}

/// Next non-comment line, which must start with `keyword`.
fn expect_line<S: LineSource>(reader: &mut LineReader<S>, keyword: &str) -> Result<String> {
    let line = reader
        .next_data_line()?
        .ok_or_else(|| JvxlError::header(reader.line_number() + 1, format!("missing '{keyword}' line")))?;
    let trimmed = line.trim_start();
    if !trimmed.starts_with(keyword) {
        return Err(JvxlError::header(
            reader.line_number(),
            format!("expected '{keyword}', found '{line}'"),
        ));
    }
    Ok(trimmed.to_string())
}

fn read_counts(text: &str, line_number: usize) -> Result<[usize; 3]> {
    let mut tokens = Tokens::new(text);
    let mut counts = [0usize; 3];
    for count in &mut counts {
        *count = tokens
            .next_int()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| JvxlError::header(line_number, "invalid APBS grid count"))?;
    }
    Ok(counts)
}
