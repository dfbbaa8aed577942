//! MD2 file parser

use std::path::Path;

use crate::error::{Md2Error, Md2Result};
use crate::header::{non_negative, Md2Header};
use crate::model::{Frame, Md2Model, RawVertex, TexCoord, Triangle};
use crate::reader::FieldReader;
use crate::{
    FRAME_HEADER_SIZE, FRAME_NAME_SIZE, MAX_VERTICES, NUM_NORMALS, SKIN_NAME_SIZE, TEX_COORD_SIZE,
    TRIANGLE_SIZE, VERTEX_SIZE,
};

/// Parse an MD2 file into an [`Md2Model`]
///
/// Every table is bounds-checked against the buffer and every triangle and
/// normal index is checked against its table before anything is returned.
///
/// # Example
/// ```ignore
/// let data = std::fs::read("tris.md2")?;
/// let model = parse_md2(&data)?;
/// println!("{} frames", model.frame_count());
/// ```
pub fn parse_md2(data: &[u8]) -> Md2Result<Md2Model> {
    let reader = FieldReader::new(data);
    let header = Md2Header::parse(&reader)?;
    check_vertex_count(header.vertex_count()?)?;

    let skins = parse_skins(&reader, &header)?;
    let tex_coords = parse_tex_coords(&reader, &header)?;
    let triangles = parse_triangles(&reader, &header)?;
    validate_triangles(&triangles, header.vertex_count()?, tex_coords.len())?;
    let frames = parse_frames(&reader, &header)?;
    let gl_commands = parse_gl_commands(&reader, &header)?;

    tracing::info!("triangles: {}", triangles.len());
    tracing::info!("texcoords: {}", tex_coords.len());
    tracing::info!(
        "frames: {} of {} vertices",
        frames.len(),
        header.vertex_count()?
    );

    Ok(Md2Model {
        header,
        skins,
        tex_coords,
        triangles,
        frames,
        gl_commands,
    })
}

/// Read a whole MD2 file into memory and parse it
pub fn load_md2(path: impl AsRef<Path>) -> Md2Result<Md2Model> {
    let path = path.as_ref();
    tracing::debug!("Loading {}", path.display());
    let data = std::fs::read(path)?;
    parse_md2(&data)
}

/// Reject vertex pools larger than i16 triangle indices can reach
pub(crate) fn check_vertex_count(count: usize) -> Md2Result<()> {
    if count > MAX_VERTICES {
        return Err(Md2Error::TooManyVertices { count });
    }
    Ok(())
}

/// Resolve a table's offset and bounds-check `count * stride` bytes from it
fn table_offset(
    reader: &FieldReader<'_>,
    table: &'static str,
    ofs_field: &'static str,
    offset: i32,
    count: usize,
    stride: usize,
) -> Md2Result<usize> {
    let offset = non_negative(ofs_field, offset)?;
    if count > 0 {
        reader.check_table(table, offset, count, stride)?;
    }
    Ok(offset)
}

fn parse_skins(reader: &FieldReader<'_>, header: &Md2Header) -> Md2Result<Vec<String>> {
    let count = header.skin_count()?;
    let base = table_offset(reader, "skin", "skin_ofs", header.skin_ofs, count, SKIN_NAME_SIZE)?;

    (0..count)
        .map(|i| reader.read_name(base + i * SKIN_NAME_SIZE, SKIN_NAME_SIZE))
        .collect()
}

fn parse_tex_coords(reader: &FieldReader<'_>, header: &Md2Header) -> Md2Result<Vec<TexCoord>> {
    let count = header.uv_count()?;
    let base = table_offset(reader, "texcoord", "uv_ofs", header.uv_ofs, count, TEX_COORD_SIZE)?;

    if count > 0 && (header.skin_width <= 0 || header.skin_height <= 0) {
        return Err(Md2Error::InvalidSkinSize {
            width: header.skin_width,
            height: header.skin_height,
        });
    }

    (0..count)
        .map(|i| {
            let o = base + i * TEX_COORD_SIZE;
            Ok(TexCoord::from_raw(
                reader.read_i16(o)?,
                reader.read_i16(o + 2)?,
                header.skin_width,
                header.skin_height,
            ))
        })
        .collect()
}

fn parse_triangles(reader: &FieldReader<'_>, header: &Md2Header) -> Md2Result<Vec<Triangle>> {
    let count = header.face_count()?;
    let base = table_offset(reader, "triangle", "face_ofs", header.face_ofs, count, TRIANGLE_SIZE)?;

    (0..count)
        .map(|i| {
            let o = base + i * TRIANGLE_SIZE;
            let mut shorts = [0i16; 6];
            for (j, value) in shorts.iter_mut().enumerate() {
                *value = reader.read_i16(o + j * 2)?;
            }
            Ok(Triangle::new(
                [shorts[0], shorts[1], shorts[2]],
                [shorts[3], shorts[4], shorts[5]],
            ))
        })
        .collect()
}

/// Reject triangles whose corners point outside the vertex or texcoord tables
pub(crate) fn validate_triangles(
    triangles: &[Triangle],
    vertex_count: usize,
    uv_count: usize,
) -> Md2Result<()> {
    for (triangle, tri) in triangles.iter().enumerate() {
        if let Some(&index) = tri
            .vertices
            .iter()
            .find(|&&v| v < 0 || v as usize >= vertex_count)
        {
            return Err(Md2Error::VertexIndexOutOfRange {
                triangle,
                index,
                vertex_count,
            });
        }
        if let Some(&index) = tri
            .tex_coords
            .iter()
            .find(|&&t| t < 0 || t as usize >= uv_count)
        {
            return Err(Md2Error::TexCoordIndexOutOfRange {
                triangle,
                index,
                uv_count,
            });
        }
    }
    Ok(())
}

fn parse_frames(reader: &FieldReader<'_>, header: &Md2Header) -> Md2Result<Vec<Frame>> {
    let count = header.frame_count()?;
    let vertex_count = header.vertex_count()?;
    let frame_size = header.frame_size()?;

    if count > 0 {
        let required = vertex_count
            .checked_mul(VERTEX_SIZE)
            .and_then(|v| v.checked_add(FRAME_HEADER_SIZE))
            .unwrap_or(usize::MAX);
        if frame_size < required {
            return Err(Md2Error::FrameSizeTooSmall {
                frame_size,
                required,
            });
        }
    }
    let base = table_offset(reader, "frame", "frame_ofs", header.frame_ofs, count, frame_size)?;

    (0..count)
        .map(|frame| parse_frame(reader, base + frame * frame_size, frame, vertex_count))
        .collect()
}

fn parse_frame(
    reader: &FieldReader<'_>,
    offset: usize,
    frame: usize,
    vertex_count: usize,
) -> Md2Result<Frame> {
    let scale = reader.read_vec3(offset)?;
    let translate = reader.read_vec3(offset + 12)?;
    let name = reader.read_name(offset + 24, FRAME_NAME_SIZE)?;

    let data = reader.bytes(offset + FRAME_HEADER_SIZE, vertex_count * VERTEX_SIZE)?;
    let vertices = data
        .chunks_exact(VERTEX_SIZE)
        .enumerate()
        .map(|(vertex, c)| {
            if c[3] as usize >= NUM_NORMALS {
                return Err(Md2Error::NormalIndexOutOfRange {
                    frame,
                    vertex,
                    index: c[3],
                });
            }
            Ok(RawVertex::new(c[0], c[1], c[2], c[3]))
        })
        .collect::<Md2Result<Vec<_>>>()?;

    Ok(Frame {
        scale,
        translate,
        name,
        vertices,
    })
}

fn parse_gl_commands(reader: &FieldReader<'_>, header: &Md2Header) -> Md2Result<Vec<i32>> {
    let count = header.glcmd_count()?;
    let base = table_offset(reader, "glcmd", "glcmd_ofs", header.glcmd_ofs, count, 4)?;

    (0..count).map(|i| reader.read_i32(base + i * 4)).collect()
}
