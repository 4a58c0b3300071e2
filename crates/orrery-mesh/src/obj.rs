//! Minimal Wavefront OBJ reader.
//!
//! Understands `v`, `vt`, `vn` and fully specified triangle faces
//! (`f p/u/n p/u/n p/u/n`). Anything after `#` is a comment and every other
//! record is skipped. UV `v` is flipped on read so images can be uploaded top
//! row first.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::mesh::Mesh;

/// Longest accepted line, in bytes, excluding the line terminator.
pub const MAX_LINE_LEN: usize = 1000;

/// Bytes read per line at most: the longest line plus `\r\n`.
const LINE_READ_LIMIT: u64 = MAX_LINE_LEN as u64 + 2;

/// Which attribute table a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttributeKind::Position => "position",
            AttributeKind::TexCoord => "uv",
            AttributeKind::Normal => "normal",
        })
    }
}

/// Errors raised while loading a model. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("model file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read model: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: face must have exactly three p/u/n corners")]
    MalformedFace { line: usize },

    #[error("line {line}: invalid number")]
    InvalidNumber { line: usize },

    #[error("line {line}: {kind} index {index} out of range")]
    IndexOutOfRange {
        line: usize,
        kind: AttributeKind,
        index: i64,
    },

    #[error("line {line}: longer than {max} bytes", max = MAX_LINE_LEN)]
    LineTooLong { line: usize },
}

/// One face corner, still 1-based as written in the file.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: i64,
    uv: i64,
    normal: i64,
}

#[derive(Debug)]
struct Face {
    line: usize,
    corners: [Corner; 3],
}

/// Open `path` and parse it as OBJ.
///
/// # Errors
/// [`ParseError::FileNotFound`] if the file cannot be opened, otherwise any
/// error from [`parse_obj`].
pub fn load_obj(path: &Path) -> Result<Mesh, ParseError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ParseError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ParseError::Io(e),
    })?;

    let mesh = parse_obj(BufReader::new(file))?;
    info!(
        "Loaded model {} ({} triangles)",
        path.display(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text from any buffered reader.
///
/// Attribute tables are collected first; faces are resolved against them once
/// the whole input has been read, so faces may reference attributes declared
/// later in the file.
///
/// # Errors
/// See [`ParseError`]. No partial mesh is returned on failure.
pub fn parse_obj<R: BufRead>(mut reader: R) -> Result<Mesh, ParseError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    let mut buf = Vec::new();
    let mut line = 0;
    loop {
        buf.clear();
        if reader.by_ref().take(LINE_READ_LIMIT).read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line += 1;

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        if bytes.len() > MAX_LINE_LEN {
            return Err(ParseError::LineTooLong { line });
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let text = text.split_once('#').map_or(text, |(record, _)| record);

        let mut tokens = text.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line)?;
                positions.push(Vec3::new(x, y, z));
            }
            Some("vt") => {
                let [u, v] = parse_floats::<2>(&mut tokens, line)?;
                uvs.push(Vec2::new(u, -v));
            }
            Some("vn") => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line)?;
                normals.push(Vec3::new(x, y, z));
            }
            Some("f") => faces.push(parse_face(tokens, line)?),
            _ => {}
        }
    }

    debug!(
        "OBJ tables: {} positions, {} uvs, {} normals, {} faces",
        positions.len(),
        uvs.len(),
        normals.len(),
        faces.len()
    );

    let mut mesh = Mesh {
        positions: Vec::with_capacity(faces.len() * 3),
        uvs: Vec::with_capacity(faces.len() * 3),
        normals: Vec::with_capacity(faces.len() * 3),
    };
    for face in &faces {
        for corner in &face.corners {
            mesh.positions.push(lookup(
                &positions,
                corner.position,
                AttributeKind::Position,
                face.line,
            )?);
            mesh.uvs
                .push(lookup(&uvs, corner.uv, AttributeKind::TexCoord, face.line)?);
            mesh.normals.push(lookup(
                &normals,
                corner.normal,
                AttributeKind::Normal,
                face.line,
            )?);
        }
    }

    Ok(mesh)
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], ParseError> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or(ParseError::InvalidNumber { line })?;
    }
    Ok(out)
}

fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Face, ParseError> {
    let corners = tokens
        .map(|token| parse_corner(token).ok_or(ParseError::MalformedFace { line }))
        .collect::<Result<Vec<_>, _>>()?;

    let corners: [Corner; 3] = corners
        .try_into()
        .map_err(|_| ParseError::MalformedFace { line })?;
    Ok(Face { line, corners })
}

fn parse_corner(token: &str) -> Option<Corner> {
    let mut parts = token.split('/');
    let position = parts.next()?.parse().ok()?;
    let uv = parts.next()?.parse().ok()?;
    let normal = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Corner {
        position,
        uv,
        normal,
    })
}

fn lookup<T: Copy>(
    table: &[T],
    index: i64,
    kind: AttributeKind,
    line: usize,
) -> Result<T, ParseError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| table.get(i))
        .copied()
        .ok_or(ParseError::IndexOutOfRange { line, kind, index })
}
