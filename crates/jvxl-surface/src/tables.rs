//! Lookup tables for marching cubes and marching squares.
//!
//! Cube corners are numbered 0-3 around the `y = 0` face and 4-7 around `y = 1`;
//! edges 0-3 and 4-7 run around those faces and 8-11 connect them.

#![allow(clippy::unreadable_literal)]

/// Lattice offset of each cube corner.
pub const CUBE_VERTEX_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 0, 1],
    [0, 0, 1],
    [0, 1, 0],
    [1, 1, 0],
    [1, 1, 1],
    [0, 1, 1],
];

/// Corner pair joined by each cube edge.
pub const EDGE_VERTICES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Axis each cube edge runs along: 0 = x, 1 = y, 2 = z.
pub const EDGE_TYPES: [u8; 12] = [0, 2, 0, 2, 0, 2, 0, 2, 1, 1, 1, 1];

/// Bit `i` is set when edge `i` crosses the surface, indexed by the inside-corner mask.
#[rustfmt::skip]
pub static INSIDE_MASK_TABLE: [u16; 256] = [
    0x0000, 0x0109, 0x0203, 0x030A, 0x0406, 0x050F, 0x0605, 0x070C,
    0x080C, 0x0905, 0x0A0F, 0x0B06, 0x0C0A, 0x0D03, 0x0E09, 0x0F00,
    0x0190, 0x0099, 0x0393, 0x029A, 0x0596, 0x049F, 0x0795, 0x069C,
    0x099C, 0x0895, 0x0B9F, 0x0A96, 0x0D9A, 0x0C93, 0x0F99, 0x0E90,
    0x0230, 0x0339, 0x0033, 0x013A, 0x0636, 0x073F, 0x0435, 0x053C,
    0x0A3C, 0x0B35, 0x083F, 0x0936, 0x0E3A, 0x0F33, 0x0C39, 0x0D30,
    0x03A0, 0x02A9, 0x01A3, 0x00AA, 0x07A6, 0x06AF, 0x05A5, 0x04AC,
    0x0BAC, 0x0AA5, 0x09AF, 0x08A6, 0x0FAA, 0x0EA3, 0x0DA9, 0x0CA0,
    0x0460, 0x0569, 0x0663, 0x076A, 0x0066, 0x016F, 0x0265, 0x036C,
    0x0C6C, 0x0D65, 0x0E6F, 0x0F66, 0x086A, 0x0963, 0x0A69, 0x0B60,
    0x05F0, 0x04F9, 0x07F3, 0x06FA, 0x01F6, 0x00FF, 0x03F5, 0x02FC,
    0x0DFC, 0x0CF5, 0x0FFF, 0x0EF6, 0x09FA, 0x08F3, 0x0BF9, 0x0AF0,
    0x0650, 0x0759, 0x0453, 0x055A, 0x0256, 0x035F, 0x0055, 0x015C,
    0x0E5C, 0x0F55, 0x0C5F, 0x0D56, 0x0A5A, 0x0B53, 0x0859, 0x0950,
    0x07C0, 0x06C9, 0x05C3, 0x04CA, 0x03C6, 0x02CF, 0x01C5, 0x00CC,
    0x0FCC, 0x0EC5, 0x0DCF, 0x0CC6, 0x0BCA, 0x0AC3, 0x09C9, 0x08C0,
    0x08C0, 0x09C9, 0x0AC3, 0x0BCA, 0x0CC6, 0x0DCF, 0x0EC5, 0x0FCC,
    0x00CC, 0x01C5, 0x02CF, 0x03C6, 0x04CA, 0x05C3, 0x06C9, 0x07C0,
    0x0950, 0x0859, 0x0B53, 0x0A5A, 0x0D56, 0x0C5F, 0x0F55, 0x0E5C,
    0x015C, 0x0055, 0x035F, 0x0256, 0x055A, 0x0453, 0x0759, 0x0650,
    0x0AF0, 0x0BF9, 0x08F3, 0x09FA, 0x0EF6, 0x0FFF, 0x0CF5, 0x0DFC,
    0x02FC, 0x03F5, 0x00FF, 0x01F6, 0x06FA, 0x07F3, 0x04F9, 0x05F0,
    0x0B60, 0x0A69, 0x0963, 0x086A, 0x0F66, 0x0E6F, 0x0D65, 0x0C6C,
    0x036C, 0x0265, 0x016F, 0x0066, 0x076A, 0x0663, 0x0569, 0x0460,
    0x0CA0, 0x0DA9, 0x0EA3, 0x0FAA, 0x08A6, 0x09AF, 0x0AA5, 0x0BAC,
    0x04AC, 0x05A5, 0x06AF, 0x07A6, 0x00AA, 0x01A3, 0x02A9, 0x03A0,
    0x0D30, 0x0C39, 0x0F33, 0x0E3A, 0x0936, 0x083F, 0x0B35, 0x0A3C,
    0x053C, 0x0435, 0x073F, 0x0636, 0x013A, 0x0033, 0x0339, 0x0230,
    0x0E90, 0x0F99, 0x0C93, 0x0D9A, 0x0A96, 0x0B9F, 0x0895, 0x099C,
    0x069C, 0x0795, 0x049F, 0x0596, 0x029A, 0x0393, 0x0099, 0x0190,
    0x0F00, 0x0E09, 0x0D03, 0x0C0A, 0x0B06, 0x0A0F, 0x0905, 0x080C,
    0x070C, 0x0605, 0x050F, 0x0406, 0x030A, 0x0203, 0x0109, 0x0000,
];

/// Triangles for each inside-corner mask as groups of four: three edge indices and
/// a 3-bit mask marking which triangle sides are true polygon edges.
#[rustfmt::skip]
pub static TRIANGLE_TABLE: [&[u8]; 256] = [
    &[],
    &[0, 8, 3, 7],
    &[0, 1, 9, 7],
    &[1, 8, 3, 6, 9, 8, 1, 5],
    &[1, 2, 10, 7],
    &[0, 8, 3, 7, 1, 2, 10, 7],
    &[9, 2, 10, 6, 0, 2, 9, 5],
    &[2, 8, 3, 6, 2, 10, 8, 1, 10, 9, 8, 3],
    &[3, 11, 2, 7],
    &[0, 11, 2, 6, 8, 11, 0, 5],
    &[1, 9, 0, 7, 2, 3, 11, 7],
    &[1, 11, 2, 6, 1, 9, 11, 1, 9, 8, 11, 3],
    &[3, 10, 1, 6, 11, 10, 3, 5],
    &[0, 10, 1, 6, 0, 8, 10, 1, 8, 11, 10, 3],
    &[3, 9, 0, 6, 3, 11, 9, 1, 11, 10, 9, 3],
    &[9, 8, 10, 5, 10, 8, 11, 6],
    &[4, 7, 8, 7],
    &[4, 3, 0, 6, 7, 3, 4, 5],
    &[0, 1, 9, 7, 8, 4, 7, 7],
    &[4, 1, 9, 6, 4, 7, 1, 1, 7, 3, 1, 3],
    &[1, 2, 10, 7, 8, 4, 7, 7],
    &[3, 4, 7, 6, 3, 0, 4, 3, 1, 2, 10, 7],
    &[9, 2, 10, 6, 9, 0, 2, 3, 8, 4, 7, 7],
    &[2, 10, 9, 3, 2, 9, 7, 0, 2, 7, 3, 6, 7, 9, 4, 6],
    &[8, 4, 7, 7, 3, 11, 2, 7],
    &[11, 4, 7, 6, 11, 2, 4, 1, 2, 0, 4, 3],
    &[9, 0, 1, 7, 8, 4, 7, 7, 2, 3, 11, 7],
    &[4, 7, 11, 3, 9, 4, 11, 1, 9, 11, 2, 2, 9, 2, 1, 6],
    &[3, 10, 1, 6, 3, 11, 10, 3, 7, 8, 4, 7],
    &[1, 11, 10, 6, 1, 4, 11, 0, 1, 0, 4, 3, 7, 11, 4, 5],
    &[4, 7, 8, 7, 9, 0, 11, 1, 9, 11, 10, 6, 11, 0, 3, 6],
    &[4, 7, 11, 3, 4, 11, 9, 4, 9, 11, 10, 6],
    &[9, 5, 4, 7],
    &[9, 5, 4, 7, 0, 8, 3, 7],
    &[0, 5, 4, 6, 1, 5, 0, 5],
    &[8, 5, 4, 6, 8, 3, 5, 1, 3, 1, 5, 3],
    &[1, 2, 10, 7, 9, 5, 4, 7],
    &[3, 0, 8, 7, 1, 2, 10, 7, 4, 9, 5, 7],
    &[5, 2, 10, 6, 5, 4, 2, 1, 4, 0, 2, 3],
    &[2, 10, 5, 3, 3, 2, 5, 1, 3, 5, 4, 2, 3, 4, 8, 6],
    &[9, 5, 4, 7, 2, 3, 11, 7],
    &[0, 11, 2, 6, 0, 8, 11, 3, 4, 9, 5, 7],
    &[0, 5, 4, 6, 0, 1, 5, 3, 2, 3, 11, 7],
    &[2, 1, 5, 3, 2, 5, 8, 0, 2, 8, 11, 6, 4, 8, 5, 5],
    &[10, 3, 11, 6, 10, 1, 3, 3, 9, 5, 4, 7],
    &[4, 9, 5, 7, 0, 8, 1, 5, 8, 10, 1, 2, 8, 11, 10, 3],
    &[5, 4, 0, 3, 5, 0, 11, 0, 5, 11, 10, 6, 11, 0, 3, 6],
    &[5, 4, 8, 3, 5, 8, 10, 4, 10, 8, 11, 6],
    &[9, 7, 8, 6, 5, 7, 9, 5],
    &[9, 3, 0, 6, 9, 5, 3, 1, 5, 7, 3, 3],
    &[0, 7, 8, 6, 0, 1, 7, 1, 1, 5, 7, 3],
    &[1, 5, 3, 5, 3, 5, 7, 6],
    &[9, 7, 8, 6, 9, 5, 7, 3, 10, 1, 2, 7],
    &[10, 1, 2, 7, 9, 5, 0, 5, 5, 3, 0, 2, 5, 7, 3, 3],
    &[8, 0, 2, 3, 8, 2, 5, 0, 8, 5, 7, 6, 10, 5, 2, 5],
    &[2, 10, 5, 3, 2, 5, 3, 4, 3, 5, 7, 6],
    &[7, 9, 5, 6, 7, 8, 9, 3, 3, 11, 2, 7],
    &[9, 5, 7, 3, 9, 7, 2, 0, 9, 2, 0, 6, 2, 7, 11, 6],
    &[2, 3, 11, 7, 0, 1, 8, 5, 1, 7, 8, 2, 1, 5, 7, 3],
    &[11, 2, 1, 3, 11, 1, 7, 4, 7, 1, 5, 6],
    &[9, 5, 8, 5, 8, 5, 7, 6, 10, 1, 3, 3, 10, 3, 11, 6],
    &[5, 7, 0, 1, 5, 0, 9, 6, 7, 11, 0, 1, 1, 0, 10, 5, 11, 10, 0, 1],
    &[11, 10, 0, 1, 11, 0, 3, 6, 10, 5, 0, 1, 8, 0, 7, 5, 5, 7, 0, 1],
    &[11, 10, 5, 3, 7, 11, 5, 5],
    &[10, 6, 5, 7],
    &[0, 8, 3, 7, 5, 10, 6, 7],
    &[9, 0, 1, 7, 5, 10, 6, 7],
    &[1, 8, 3, 6, 1, 9, 8, 3, 5, 10, 6, 7],
    &[1, 6, 5, 6, 2, 6, 1, 5],
    &[1, 6, 5, 6, 1, 2, 6, 3, 3, 0, 8, 7],
    &[9, 6, 5, 6, 9, 0, 6, 1, 0, 2, 6, 3],
    &[5, 9, 8, 3, 5, 8, 2, 0, 5, 2, 6, 6, 3, 2, 8, 5],
    &[2, 3, 11, 7, 10, 6, 5, 7],
    &[11, 0, 8, 6, 11, 2, 0, 3, 10, 6, 5, 7],
    &[0, 1, 9, 7, 2, 3, 11, 7, 5, 10, 6, 7],
    &[5, 10, 6, 7, 1, 9, 2, 5, 9, 11, 2, 2, 9, 8, 11, 3],
    &[6, 3, 11, 6, 6, 5, 3, 1, 5, 1, 3, 3],
    &[0, 8, 11, 3, 0, 11, 5, 0, 0, 5, 1, 6, 5, 11, 6, 6],
    &[3, 11, 6, 3, 0, 3, 6, 1, 0, 6, 5, 2, 0, 5, 9, 6],
    &[6, 5, 9, 3, 6, 9, 11, 4, 11, 9, 8, 6],
    &[5, 10, 6, 7, 4, 7, 8, 7],
    &[4, 3, 0, 6, 4, 7, 3, 3, 6, 5, 10, 7],
    &[1, 9, 0, 7, 5, 10, 6, 7, 8, 4, 7, 7],
    &[10, 6, 5, 7, 1, 9, 7, 1, 1, 7, 3, 6, 7, 9, 4, 6],
    &[6, 1, 2, 6, 6, 5, 1, 3, 4, 7, 8, 7],
    &[1, 2, 5, 5, 5, 2, 6, 6, 3, 0, 4, 3, 3, 4, 7, 6],
    &[8, 4, 7, 7, 9, 0, 5, 5, 0, 6, 5, 2, 0, 2, 6, 3],
    &[7, 3, 9, 1, 7, 9, 4, 6, 3, 2, 9, 1, 5, 9, 6, 5, 2, 6, 9, 1],
    &[3, 11, 2, 7, 7, 8, 4, 7, 10, 6, 5, 7],
    &[5, 10, 6, 7, 4, 7, 2, 1, 4, 2, 0, 6, 2, 7, 11, 6],
    &[0, 1, 9, 7, 4, 7, 8, 7, 2, 3, 11, 7, 5, 10, 6, 7],
    &[9, 2, 1, 6, 9, 11, 2, 2, 9, 4, 11, 1, 7, 11, 4, 5, 5, 10, 6, 7],
    &[8, 4, 7, 7, 3, 11, 5, 1, 3, 5, 1, 6, 5, 11, 6, 6],
    &[5, 1, 11, 1, 5, 11, 6, 6, 1, 0, 11, 1, 7, 11, 4, 5, 0, 4, 11, 1],
    &[0, 5, 9, 6, 0, 6, 5, 2, 0, 3, 6, 1, 11, 6, 3, 5, 8, 4, 7, 7],
    &[6, 5, 9, 3, 6, 9, 11, 4, 4, 7, 9, 5, 7, 11, 9, 1],
    &[10, 4, 9, 6, 6, 4, 10, 5],
    &[4, 10, 6, 6, 4, 9, 10, 3, 0, 8, 3, 7],
    &[10, 0, 1, 6, 10, 6, 0, 1, 6, 4, 0, 3],
    &[8, 3, 1, 3, 8, 1, 6, 0, 8, 6, 4, 6, 6, 1, 10, 6],
    &[1, 4, 9, 6, 1, 2, 4, 1, 2, 6, 4, 3],
    &[3, 0, 8, 7, 1, 2, 9, 5, 2, 4, 9, 2, 2, 6, 4, 3],
    &[0, 2, 4, 5, 4, 2, 6, 6],
    &[8, 3, 2, 3, 8, 2, 4, 4, 4, 2, 6, 6],
    &[10, 4, 9, 6, 10, 6, 4, 3, 11, 2, 3, 7],
    &[0, 8, 2, 5, 2, 8, 11, 6, 4, 9, 10, 3, 4, 10, 6, 6],
    &[3, 11, 2, 7, 0, 1, 6, 1, 0, 6, 4, 6, 6, 1, 10, 6],
    &[6, 4, 1, 1, 6, 1, 10, 6, 4, 8, 1, 1, 2, 1, 11, 5, 8, 11, 1, 1],
    &[9, 6, 4, 6, 9, 3, 6, 0, 9, 1, 3, 3, 11, 6, 3, 5],
    &[8, 11, 1, 1, 8, 1, 0, 6, 11, 6, 1, 1, 9, 1, 4, 5, 6, 4, 1, 1],
    &[3, 11, 6, 3, 3, 6, 0, 4, 0, 6, 4, 6],
    &[6, 4, 8, 3, 11, 6, 8, 5],
    &[7, 10, 6, 6, 7, 8, 10, 1, 8, 9, 10, 3],
    &[0, 7, 3, 6, 0, 10, 7, 0, 0, 9, 10, 3, 6, 7, 10, 5],
    &[10, 6, 7, 3, 1, 10, 7, 1, 1, 7, 8, 2, 1, 8, 0, 6],
    &[10, 6, 7, 3, 10, 7, 1, 4, 1, 7, 3, 6],
    &[1, 2, 6, 3, 1, 6, 8, 0, 1, 8, 9, 6, 8, 6, 7, 6],
    &[2, 6, 9, 1, 2, 9, 1, 6, 6, 7, 9, 1, 0, 9, 3, 5, 7, 3, 9, 1],
    &[7, 8, 0, 3, 7, 0, 6, 4, 6, 0, 2, 6],
    &[7, 3, 2, 3, 6, 7, 2, 5],
    &[2, 3, 11, 7, 10, 6, 8, 1, 10, 8, 9, 6, 8, 6, 7, 6],
    &[2, 0, 7, 1, 2, 7, 11, 6, 0, 9, 7, 1, 6, 7, 10, 5, 9, 10, 7, 1],
    &[1, 8, 0, 6, 1, 7, 8, 2, 1, 10, 7, 1, 6, 7, 10, 5, 2, 3, 11, 7],
    &[11, 2, 1, 3, 11, 1, 7, 4, 10, 6, 1, 5, 6, 7, 1, 1],
    &[8, 9, 6, 1, 8, 6, 7, 6, 9, 1, 6, 1, 11, 6, 3, 5, 1, 3, 6, 1],
    &[0, 9, 1, 7, 11, 6, 7, 7],
    &[7, 8, 0, 3, 7, 0, 6, 4, 3, 11, 0, 5, 11, 6, 0, 1],
    &[7, 11, 6, 7],
    &[7, 6, 11, 7],
    &[3, 0, 8, 7, 11, 7, 6, 7],
    &[0, 1, 9, 7, 11, 7, 6, 7],
    &[8, 1, 9, 6, 8, 3, 1, 3, 11, 7, 6, 7],
    &[10, 1, 2, 7, 6, 11, 7, 7],
    &[1, 2, 10, 7, 3, 0, 8, 7, 6, 11, 7, 7],
    &[2, 9, 0, 6, 2, 10, 9, 3, 6, 11, 7, 7],
    &[6, 11, 7, 7, 2, 10, 3, 5, 10, 8, 3, 2, 10, 9, 8, 3],
    &[7, 2, 3, 6, 6, 2, 7, 5],
    &[7, 0, 8, 6, 7, 6, 0, 1, 6, 2, 0, 3],
    &[2, 7, 6, 6, 2, 3, 7, 3, 0, 1, 9, 7],
    &[1, 6, 2, 6, 1, 8, 6, 0, 1, 9, 8, 3, 8, 7, 6, 3],
    &[10, 7, 6, 6, 10, 1, 7, 1, 1, 3, 7, 3],
    &[10, 7, 6, 6, 1, 7, 10, 4, 1, 8, 7, 2, 1, 0, 8, 3],
    &[0, 3, 7, 3, 0, 7, 10, 0, 0, 10, 9, 6, 6, 10, 7, 5],
    &[7, 6, 10, 3, 7, 10, 8, 4, 8, 10, 9, 6],
    &[6, 8, 4, 6, 11, 8, 6, 5],
    &[3, 6, 11, 6, 3, 0, 6, 1, 0, 4, 6, 3],
    &[8, 6, 11, 6, 8, 4, 6, 3, 9, 0, 1, 7],
    &[9, 4, 6, 3, 9, 6, 3, 0, 9, 3, 1, 6, 11, 3, 6, 5],
    &[6, 8, 4, 6, 6, 11, 8, 3, 2, 10, 1, 7],
    &[1, 2, 10, 7, 3, 0, 11, 5, 0, 6, 11, 2, 0, 4, 6, 3],
    &[4, 11, 8, 6, 4, 6, 11, 3, 0, 2, 9, 5, 2, 10, 9, 3],
    &[10, 9, 3, 1, 10, 3, 2, 6, 9, 4, 3, 1, 11, 3, 6, 5, 4, 6, 3, 1],
    &[8, 2, 3, 6, 8, 4, 2, 1, 4, 6, 2, 3],
    &[0, 4, 2, 5, 4, 6, 2, 3],
    &[1, 9, 0, 7, 2, 3, 4, 1, 2, 4, 6, 6, 4, 3, 8, 6],
    &[1, 9, 4, 3, 1, 4, 2, 4, 2, 4, 6, 6],
    &[8, 1, 3, 6, 8, 6, 1, 0, 8, 4, 6, 3, 6, 10, 1, 3],
    &[10, 1, 0, 3, 10, 0, 6, 4, 6, 0, 4, 6],
    &[4, 6, 3, 1, 4, 3, 8, 6, 6, 10, 3, 1, 0, 3, 9, 5, 10, 9, 3, 1],
    &[10, 9, 4, 3, 6, 10, 4, 5],
    &[4, 9, 5, 7, 7, 6, 11, 7],
    &[0, 8, 3, 7, 4, 9, 5, 7, 11, 7, 6, 7],
    &[5, 0, 1, 6, 5, 4, 0, 3, 7, 6, 11, 7],
    &[11, 7, 6, 7, 8, 3, 4, 5, 3, 5, 4, 2, 3, 1, 5, 3],
    &[9, 5, 4, 7, 10, 1, 2, 7, 7, 6, 11, 7],
    &[6, 11, 7, 7, 1, 2, 10, 7, 0, 8, 3, 7, 4, 9, 5, 7],
    &[7, 6, 11, 7, 5, 4, 10, 5, 4, 2, 10, 2, 4, 0, 2, 3],
    &[3, 4, 8, 6, 3, 5, 4, 2, 3, 2, 5, 1, 10, 5, 2, 5, 11, 7, 6, 7],
    &[7, 2, 3, 6, 7, 6, 2, 3, 5, 4, 9, 7],
    &[9, 5, 4, 7, 0, 8, 6, 1, 0, 6, 2, 6, 6, 8, 7, 6],
    &[3, 6, 2, 6, 3, 7, 6, 3, 1, 5, 0, 5, 5, 4, 0, 3],
    &[6, 2, 8, 1, 6, 8, 7, 6, 2, 1, 8, 1, 4, 8, 5, 5, 1, 5, 8, 1],
    &[9, 5, 4, 7, 10, 1, 6, 5, 1, 7, 6, 2, 1, 3, 7, 3],
    &[1, 6, 10, 6, 1, 7, 6, 2, 1, 0, 7, 1, 8, 7, 0, 5, 9, 5, 4, 7],
    &[4, 0, 10, 1, 4, 10, 5, 6, 0, 3, 10, 1, 6, 10, 7, 5, 3, 7, 10, 1],
    &[7, 6, 10, 3, 7, 10, 8, 4, 5, 4, 10, 5, 4, 8, 10, 1],
    &[6, 9, 5, 6, 6, 11, 9, 1, 11, 8, 9, 3],
    &[3, 6, 11, 6, 0, 6, 3, 4, 0, 5, 6, 2, 0, 9, 5, 3],
    &[0, 11, 8, 6, 0, 5, 11, 0, 0, 1, 5, 3, 5, 6, 11, 3],
    &[6, 11, 3, 3, 6, 3, 5, 4, 5, 3, 1, 6],
    &[1, 2, 10, 7, 9, 5, 11, 1, 9, 11, 8, 6, 11, 5, 6, 6],
    &[0, 11, 3, 6, 0, 6, 11, 2, 0, 9, 6, 1, 5, 6, 9, 5, 1, 2, 10, 7],
    &[11, 8, 5, 1, 11, 5, 6, 6, 8, 0, 5, 1, 10, 5, 2, 5, 0, 2, 5, 1],
    &[6, 11, 3, 3, 6, 3, 5, 4, 2, 10, 3, 5, 10, 5, 3, 1],
    &[5, 8, 9, 6, 5, 2, 8, 0, 5, 6, 2, 3, 3, 8, 2, 5],
    &[9, 5, 6, 3, 9, 6, 0, 4, 0, 6, 2, 6],
    &[1, 5, 8, 1, 1, 8, 0, 6, 5, 6, 8, 1, 3, 8, 2, 5, 6, 2, 8, 1],
    &[1, 5, 6, 3, 2, 1, 6, 5],
    &[1, 3, 6, 1, 1, 6, 10, 6, 3, 8, 6, 1, 5, 6, 9, 5, 8, 9, 6, 1],
    &[10, 1, 0, 3, 10, 0, 6, 4, 9, 5, 0, 5, 5, 6, 0, 1],
    &[0, 3, 8, 7, 5, 6, 10, 7],
    &[10, 5, 6, 7],
    &[11, 5, 10, 6, 7, 5, 11, 5],
    &[11, 5, 10, 6, 11, 7, 5, 3, 8, 3, 0, 7],
    &[5, 11, 7, 6, 5, 10, 11, 3, 1, 9, 0, 7],
    &[10, 7, 5, 6, 10, 11, 7, 3, 9, 8, 1, 5, 8, 3, 1, 3],
    &[11, 1, 2, 6, 11, 7, 1, 1, 7, 5, 1, 3],
    &[0, 8, 3, 7, 1, 2, 7, 1, 1, 7, 5, 6, 7, 2, 11, 6],
    &[9, 7, 5, 6, 9, 2, 7, 0, 9, 0, 2, 3, 2, 11, 7, 3],
    &[7, 5, 2, 1, 7, 2, 11, 6, 5, 9, 2, 1, 3, 2, 8, 5, 9, 8, 2, 1],
    &[2, 5, 10, 6, 2, 3, 5, 1, 3, 7, 5, 3],
    &[8, 2, 0, 6, 8, 5, 2, 0, 8, 7, 5, 3, 10, 2, 5, 5],
    &[9, 0, 1, 7, 5, 10, 3, 1, 5, 3, 7, 6, 3, 10, 2, 6],
    &[9, 8, 2, 1, 9, 2, 1, 6, 8, 7, 2, 1, 10, 2, 5, 5, 7, 5, 2, 1],
    &[1, 3, 5, 5, 3, 7, 5, 3],
    &[0, 8, 7, 3, 0, 7, 1, 4, 1, 7, 5, 6],
    &[9, 0, 3, 3, 9, 3, 5, 4, 5, 3, 7, 6],
    &[9, 8, 7, 3, 5, 9, 7, 5],
    &[5, 8, 4, 6, 5, 10, 8, 1, 10, 11, 8, 3],
    &[5, 0, 4, 6, 5, 11, 0, 0, 5, 10, 11, 3, 11, 3, 0, 3],
    &[0, 1, 9, 7, 8, 4, 10, 1, 8, 10, 11, 6, 10, 4, 5, 6],
    &[10, 11, 4, 1, 10, 4, 5, 6, 11, 3, 4, 1, 9, 4, 1, 5, 3, 1, 4, 1],
    &[2, 5, 1, 6, 2, 8, 5, 0, 2, 11, 8, 3, 4, 5, 8, 5],
    &[0, 4, 11, 1, 0, 11, 3, 6, 4, 5, 11, 1, 2, 11, 1, 5, 5, 1, 11, 1],
    &[0, 2, 5, 1, 0, 5, 9, 6, 2, 11, 5, 1, 4, 5, 8, 5, 11, 8, 5, 1],
    &[9, 4, 5, 7, 2, 11, 3, 7],
    &[2, 5, 10, 6, 3, 5, 2, 4, 3, 4, 5, 2, 3, 8, 4, 3],
    &[5, 10, 2, 3, 5, 2, 4, 4, 4, 2, 0, 6],
    &[3, 10, 2, 6, 3, 5, 10, 2, 3, 8, 5, 1, 4, 5, 8, 5, 0, 1, 9, 7],
    &[5, 10, 2, 3, 5, 2, 4, 4, 1, 9, 2, 5, 9, 4, 2, 1],
    &[8, 4, 5, 3, 8, 5, 3, 4, 3, 5, 1, 6],
    &[0, 4, 5, 3, 1, 0, 5, 5],
    &[8, 4, 5, 3, 8, 5, 3, 4, 9, 0, 5, 5, 0, 3, 5, 1],
    &[9, 4, 5, 7],
    &[4, 11, 7, 6, 4, 9, 11, 1, 9, 10, 11, 3],
    &[0, 8, 3, 7, 4, 9, 7, 5, 9, 11, 7, 2, 9, 10, 11, 3],
    &[1, 10, 11, 3, 1, 11, 4, 0, 1, 4, 0, 6, 7, 4, 11, 5],
    &[3, 1, 4, 1, 3, 4, 8, 6, 1, 10, 4, 1, 7, 4, 11, 5, 10, 11, 4, 1],
    &[4, 11, 7, 6, 9, 11, 4, 4, 9, 2, 11, 2, 9, 1, 2, 3],
    &[9, 7, 4, 6, 9, 11, 7, 2, 9, 1, 11, 1, 2, 11, 1, 5, 0, 8, 3, 7],
    &[11, 7, 4, 3, 11, 4, 2, 4, 2, 4, 0, 6],
    &[11, 7, 4, 3, 11, 4, 2, 4, 8, 3, 4, 5, 3, 2, 4, 1],
    &[2, 9, 10, 6, 2, 7, 9, 0, 2, 3, 7, 3, 7, 4, 9, 3],
    &[9, 10, 7, 1, 9, 7, 4, 6, 10, 2, 7, 1, 8, 7, 0, 5, 2, 0, 7, 1],
    &[3, 7, 10, 1, 3, 10, 2, 6, 7, 4, 10, 1, 1, 10, 0, 5, 4, 0, 10, 1],
    &[1, 10, 2, 7, 8, 7, 4, 7],
    &[4, 9, 1, 3, 4, 1, 7, 4, 7, 1, 3, 6],
    &[4, 9, 1, 3, 4, 1, 7, 4, 0, 8, 1, 5, 8, 7, 1, 1],
    &[4, 0, 3, 3, 7, 4, 3, 5],
    &[4, 8, 7, 7],
    &[9, 10, 8, 5, 10, 11, 8, 3],
    &[3, 0, 9, 3, 3, 9, 11, 4, 11, 9, 10, 6],
    &[0, 1, 10, 3, 0, 10, 8, 4, 8, 10, 11, 6],
    &[3, 1, 10, 3, 11, 3, 10, 5],
    &[1, 2, 11, 3, 1, 11, 9, 4, 9, 11, 8, 6],
    &[3, 0, 9, 3, 3, 9, 11, 4, 1, 2, 9, 5, 2, 11, 9, 1],
    &[0, 2, 11, 3, 8, 0, 11, 5],
    &[3, 2, 11, 7],
    &[2, 3, 8, 3, 2, 8, 10, 4, 10, 8, 9, 6],
    &[9, 10, 2, 3, 0, 9, 2, 5],
    &[2, 3, 8, 3, 2, 8, 10, 4, 0, 1, 8, 5, 1, 10, 8, 1],
    &[1, 10, 2, 7],
    &[1, 3, 8, 3, 9, 1, 8, 5],
    &[0, 9, 1, 7],
    &[0, 3, 8, 7],
    &[],
];

/// Lattice offset of each square corner in the contour plane.
pub const SQUARE_VERTEX_OFFSETS: [[usize; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// Corner pair joined by each square edge.
pub const SQUARE_EDGE_VERTICES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];

/// Bit `i` is set when square edge `i` crosses the contour, indexed by the inside-corner mask.
pub const INSIDE_MASK_TABLE_2D: [u8; 16] = [0, 9, 3, 10, 6, 15, 5, 12, 12, 5, 15, 6, 10, 3, 9, 0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_edges_cross_surface() {
        for (mask, triangles) in TRIANGLE_TABLE.iter().enumerate() {
            assert_eq!(triangles.len() % 4, 0);
            for tri in triangles.chunks(4) {
                for &edge in &tri[..3] {
                    assert!(INSIDE_MASK_TABLE[mask] & (1 << edge) != 0, "mask {mask}");
                }
                assert!(tri[3] <= 7);
            }
        }
    }

    #[test]
    fn test_complementary_masks_share_edges() {
        for mask in 0..256 {
            assert_eq!(INSIDE_MASK_TABLE[mask], INSIDE_MASK_TABLE[255 - mask]);
        }
        for mask in 0..16 {
            assert_eq!(INSIDE_MASK_TABLE_2D[mask], INSIDE_MASK_TABLE_2D[15 - mask]);
        }
    }

    #[test]
    fn test_edge_masks_match_corners() {
        for mask in 0..256usize {
            let mut expected = 0u16;
            for (edge, [a, b]) in EDGE_VERTICES.iter().enumerate() {
                if (mask >> a & 1) != (mask >> b & 1) {
                    expected |= 1 << edge;
                }
            }
            assert_eq!(INSIDE_MASK_TABLE[mask], expected, "mask {mask}");
        }
    }
}
