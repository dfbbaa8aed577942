//! MD2 file writer
//!
//! Lays tables out in the conventional order (skins, texcoords, triangles,
//! frames, GL commands) and recomputes every count and offset in the header.

use crate::error::{Md2Error, Md2Result};
use crate::header::Md2Header;
use crate::model::Md2Model;
use crate::parser::check_vertex_count;
use crate::{
    FRAME_HEADER_SIZE, FRAME_NAME_SIZE, HEADER_SIZE, MD2_IDENT, SKIN_NAME_SIZE, TEX_COORD_SIZE,
    TRIANGLE_SIZE, VERTEX_SIZE,
};

/// Compute the header describing `model` once written
///
/// Skin size and version are taken from `model.header`; everything else is derived.
/// Fails if a count or offset does not fit the header's `i32` fields.
pub fn layout_header(model: &Md2Model) -> Md2Result<Md2Header> {
    let vertex_count = model.vertex_count();
    check_vertex_count(vertex_count)?;
    let frame_size = FRAME_HEADER_SIZE + vertex_count * VERTEX_SIZE;

    let skin_ofs = HEADER_SIZE;
    let uv_ofs = table_end("uv_ofs", skin_ofs, model.skins.len(), SKIN_NAME_SIZE)?;
    let face_ofs = table_end("face_ofs", uv_ofs, model.tex_coords.len(), TEX_COORD_SIZE)?;
    let frame_ofs = table_end("frame_ofs", face_ofs, model.triangles.len(), TRIANGLE_SIZE)?;
    let glcmd_ofs = table_end("glcmd_ofs", frame_ofs, model.frames.len(), frame_size)?;
    let end_of_file = table_end("end_of_file", glcmd_ofs, model.gl_commands.len(), 4)?;

    Ok(Md2Header {
        ident: MD2_IDENT,
        version: model.header.version,
        skin_width: model.header.skin_width,
        skin_height: model.header.skin_height,
        frame_size: field("frame_size", frame_size)?,
        skin_count: field("skin_count", model.skins.len())?,
        vertex_count: field("vertex_count", vertex_count)?,
        uv_count: field("uv_count", model.tex_coords.len())?,
        face_count: field("face_count", model.triangles.len())?,
        glcmd_count: field("glcmd_count", model.gl_commands.len())?,
        frame_count: field("frame_count", model.frames.len())?,
        skin_ofs: field("skin_ofs", skin_ofs)?,
        uv_ofs: field("uv_ofs", uv_ofs)?,
        face_ofs: field("face_ofs", face_ofs)?,
        frame_ofs: field("frame_ofs", frame_ofs)?,
        glcmd_ofs: field("glcmd_ofs", glcmd_ofs)?,
        end_of_file: field("end_of_file", end_of_file)?,
    })
}

/// Offset just past a table of `count` records starting at `start`
fn table_end(
    field_name: &'static str,
    start: usize,
    count: usize,
    stride: usize,
) -> Md2Result<usize> {
    count
        .checked_mul(stride)
        .and_then(|len| start.checked_add(len))
        .ok_or(Md2Error::LayoutOverflow {
            field: field_name,
            value: usize::MAX,
        })
}

fn field(field_name: &'static str, value: usize) -> Md2Result<i32> {
    i32::try_from(value).map_err(|_| Md2Error::LayoutOverflow {
        field: field_name,
        value,
    })
}

/// Encode a model as an MD2 file
pub fn write_md2(model: &Md2Model) -> Md2Result<Vec<u8>> {
    let header = layout_header(model)?;
    let mut out = Vec::with_capacity(header.end_of_file as usize);

    out.extend_from_slice(&header.to_bytes());

    for skin in &model.skins {
        write_name(&mut out, skin, SKIN_NAME_SIZE);
    }

    for tc in &model.tex_coords {
        out.extend_from_slice(&tc.s.to_le_bytes());
        out.extend_from_slice(&tc.t.to_le_bytes());
    }

    for tri in &model.triangles {
        for index in tri.vertices.iter().chain(&tri.tex_coords) {
            out.extend_from_slice(&index.to_le_bytes());
        }
    }

    let vertex_count = header.vertex_count as usize;
    for frame in &model.frames {
        for value in frame.scale.to_array().iter().chain(&frame.translate.to_array()) {
            out.extend_from_slice(&value.to_le_bytes());
        }
        write_name(&mut out, &frame.name, FRAME_NAME_SIZE);
        // Frames shorter than the first are zero-padded to keep frame_size fixed
        for i in 0..vertex_count {
            let v = frame.vertices.get(i).copied().unwrap_or_default();
            out.extend_from_slice(&v.position);
            out.push(v.normal);
        }
    }

    for cmd in &model.gl_commands {
        out.extend_from_slice(&cmd.to_le_bytes());
    }

    debug_assert_eq!(out.len(), header.end_of_file as usize);
    Ok(out)
}

/// Fixed-width, NUL-terminated ASCII field
fn write_name(out: &mut Vec<u8>, name: &str, width: usize) {
    let bytes = name.as_bytes();
    let len = bytes.len().min(width - 1);
    out.extend_from_slice(&bytes[..len]);
    out.resize(out.len() + (width - len), 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawVertex;
    use crate::parser::parse_md2;
    use crate::test_utils::{quad_model, two_triangle_model};

    #[test]
    fn test_layout_offsets() {
        let model = quad_model();
        let header = layout_header(&model).unwrap();

        assert_eq!(header.skin_ofs, 68);
        assert_eq!(header.uv_ofs, 68 + 64);
        assert_eq!(header.face_ofs, header.uv_ofs + 4 * 4);
        assert_eq!(header.frame_ofs, header.face_ofs + 2 * 12);
        assert_eq!(header.frame_size, 40 + 4 * 4);
        assert_eq!(header.end_of_file as usize, write_md2(&model).unwrap().len());
    }

    #[test]
    fn test_write_then_parse() {
        let model = two_triangle_model();
        let parsed = parse_md2(&write_md2(&model).unwrap()).unwrap();

        assert_eq!(parsed.triangles, model.triangles);
        assert_eq!(parsed.tex_coords, model.tex_coords);
        assert_eq!(parsed.frames, model.frames);
        assert_eq!(parsed.gl_commands, model.gl_commands);
        assert_eq!(parsed.header, layout_header(&model).unwrap());
    }

    #[test]
    fn test_long_names_truncated() {
        let mut model = quad_model();
        model.frames[0].name = "a_frame_name_that_is_too_long".into();
        let parsed = parse_md2(&write_md2(&model).unwrap()).unwrap();
        assert_eq!(parsed.frames[0].name, "a_frame_name_th");
    }

    #[test]
    fn test_rejects_unaddressable_vertex_count() {
        let mut model = quad_model();
        model.frames[0].vertices = vec![RawVertex::default(); crate::MAX_VERTICES + 1];
        assert!(matches!(
            write_md2(&model),
            Err(Md2Error::TooManyVertices { count }) if count == crate::MAX_VERTICES + 1
        ));
    }

    #[test]
    fn test_header_fields_must_fit_i32() {
        assert_eq!(field("face_ofs", 1024).unwrap(), 1024);
        assert!(matches!(
            field("end_of_file", i32::MAX as usize + 1),
            Err(Md2Error::LayoutOverflow { field: "end_of_file", .. })
        ));
        assert!(table_end("frame_ofs", 68, usize::MAX, 12).is_err());
    }
}
