use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use glam::{Vec2, Vec3};

use crate::color::Color;
use crate::error::{RasterError, Result};
use crate::mesh::{Mesh, Vertex};

/// One `f` corner, zero based. Missing texture or normal references stay `None`.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Corner {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

#[derive(Debug, Default)]
struct ObjData {
    positions: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<Vec<Corner>>,
}

/// Load a Wavefront OBJ file as a single white mesh.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let file = File::open(path)?;
    read_obj(BufReader::new(file))
}

pub fn parse_obj_str(source: &str) -> Result<Mesh> {
    read_obj(source.as_bytes())
}

/// Polygons are fan triangulated and every corner becomes its own vertex.
/// Texture coordinates are flipped to a top-left origin. Corners without a
/// `vn` reference get the face normal.
pub fn read_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let data = parse(reader)?;
    fan_triangulate(&data)
}

fn parse<R: BufRead>(reader: R) -> Result<ObjData> {
    let mut data = ObjData::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue;
        }

        match tokens[0] {
            "v" => data.positions.push(Vec3::from_array(floats(&tokens, line_no)?)),
            "vt" => data.texcoords.push(Vec2::from_array(floats(&tokens, line_no)?)),
            "vn" => data.normals.push(Vec3::from_array(floats(&tokens, line_no)?)),
            "f" => {
                if tokens.len() < 4 {
                    return Err(obj_error(line_no, "face needs at least 3 corners"));
                }
                let corners = tokens[1..]
                    .iter()
                    .map(|part| parse_corner(part, &data, line_no))
                    .collect::<Result<Vec<_>>>()?;
                data.faces.push(corners);
            }
            // groups, materials and smoothing are ignored
            _ => {}
        }
    }

    Ok(data)
}

fn floats<const N: usize>(tokens: &[&str], line: usize) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for (k, slot) in out.iter_mut().enumerate() {
        let token = tokens
            .get(k + 1)
            .ok_or_else(|| obj_error(line, format!("expected {N} values after {:?}", tokens[0])))?;
        *slot = parse_token(token, line)?;
    }
    Ok(out)
}

fn parse_token<T: FromStr>(token: &str, line: usize) -> Result<T> {
    token.parse().map_err(|_| obj_error(line, format!("invalid number {token:?}")))
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`, one based; negative values count back from the end.
fn parse_corner(part: &str, data: &ObjData, line: usize) -> Result<Corner> {
    let mut fields = part.split('/');
    let v = match fields.next() {
        Some(s) if !s.is_empty() => resolve_index(s, data.positions.len(), line)?,
        _ => return Err(obj_error(line, "missing vertex index")),
    };
    let vt = match fields.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, data.texcoords.len(), line)?),
        _ => None,
    };
    let vn = match fields.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, data.normals.len(), line)?),
        _ => None,
    };
    Ok(Corner { v, vt, vn })
}

fn resolve_index(token: &str, len: usize, line: usize) -> Result<usize> {
    let raw: i64 = parse_token(token, line)?;
    let index = if raw < 0 { len as i64 + raw } else { raw - 1 };
    if index < 0 || index >= len as i64 {
        return Err(obj_error(line, format!("index {raw} out of range ({len} defined)")));
    }
    Ok(index as usize)
}

fn fan_triangulate(data: &ObjData) -> Result<Mesh> {
    let mut vertices = Vec::new();

    for face in &data.faces {
        for i in 1..face.len() - 1 {
            let corners = [face[0], face[i], face[i + 1]];
            let [a, b, c] = corners.map(|corner| data.positions[corner.v]);
            let face_normal = (b - a).cross(c - a).normalize_or_zero();

            for corner in corners {
                let uv = corner.vt.map_or(Vec2::ZERO, |t| {
                    let uv = data.texcoords[t];
                    Vec2::new(uv.x, 1.0 - uv.y)
                });
                let normal = corner.vn.map_or(face_normal, |n| data.normals[n]);
                vertices.push(Vertex::new(data.positions[corner.v], normal, Color::WHITE, uv));
            }
        }
    }

    let indices = (0..vertices.len()).collect();
    Mesh::new(vertices, indices)
}

fn obj_error(line: usize, message: impl Into<String>) -> RasterError {
    RasterError::Obj { line, message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = parse_obj_str(QUAD).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices().len(), 6);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);

        let positions: Vec<Vec3> = mesh.vertices().iter().map(|v| v.position).collect();
        assert_eq!(positions[3], Vec3::ZERO);
        assert_eq!(positions[5], Vec3::new(0.0, 1.0, 0.0));
        assert!(mesh.normals().iter().all(|n| *n == Vec3::Z));
        assert!(mesh.is_opaque());
    }

    #[test]
    fn texcoords_are_flipped_to_top_left_origin() {
        let mesh = parse_obj_str(QUAD).unwrap();
        let first = mesh.vertices()[0];
        assert_eq!((first.u, first.v), (0.0, 1.0));
        let third = mesh.vertices()[2];
        assert_eq!((third.u, third.v), (1.0, 0.0));
    }

    #[test]
    fn missing_normals_fall_back_to_face_normal() {
        let mesh = parse_obj_str("v 0 0 0\nv 0 1 0\nv 1 0 0\nf 1 2 3\n").unwrap();
        assert!(mesh.vertices().iter().all(|v| v.normal == -Vec3::Z));
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let mesh = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.vertices()[1].position, Vec3::X);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_obj_str("v 0 0 0\nv 1 0 nope\n").unwrap_err();
        assert!(matches!(err, RasterError::Obj { line: 2, .. }), "{err}");

        let err = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap_err();
        assert!(matches!(err, RasterError::Obj { line: 4, .. }), "{err}");

        let err = parse_obj_str("v 0 0 0\nf 1 1\n").unwrap_err();
        assert!(matches!(err, RasterError::Obj { line: 2, .. }), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(load_obj("does/not/exist.obj"), Err(RasterError::Io(_))));
    }
}
