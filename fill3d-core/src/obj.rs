/// Wavefront OBJ import (positions and faces)
use nom::{
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::ObjError;
use crate::geometry::{Mesh, Topology, Vertex};
use crate::math::Vector3;
use crate::transform::Transform;

/// Parse OBJ text into a triangle-list mesh.
///
/// Only `v` and `f` statements are read; texture coordinates, normals,
/// groups and materials are skipped. Faces with more than 3 corners are
/// fan-triangulated, and every face is expanded into its own vertices so the
/// result can be handed straight to the renderer.
pub fn parse_obj(input: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vector3> = Vec::new();
    let mut vertices = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let (keyword, rest) = match line.split_once(|c: char| c.is_whitespace()) {
            Some((keyword, rest)) => (keyword, rest),
            None => (line, ""),
        };

        match keyword {
            "v" => {
                let position = run(vertex_args, rest, line_no)?;
                positions.push(position);
            }
            "f" => {
                let refs = run(face_args, rest, line_no)?;
                if refs.len() < 3 {
                    return Err(ObjError::DegenerateFace {
                        line: line_no,
                        corners: refs.len(),
                    });
                }
                let corners = refs
                    .iter()
                    .map(|&index| resolve(index, positions.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;

                for k in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[k], corners[k + 1]] {
                        vertices.push(Vertex::new(positions[corner]));
                    }
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "parsed OBJ: {} positions, {} triangles",
        positions.len(),
        vertices.len() / 3
    );
    Ok(Mesh::new(Topology::List, vertices, Transform::default()))
}

fn run<'a, T>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    input: &'a str,
    line: usize,
) -> Result<T, ObjError> {
    all_consuming(terminated(parser, space0))(input)
        .map(|(_, value)| value)
        .map_err(|e| ObjError::Syntax {
            line,
            message: format!("{e}"),
        })
}

/// OBJ indices are 1-based; negative ones count back from the last position.
fn resolve(index: i64, count: usize, line: usize) -> Result<usize, ObjError> {
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(ObjError::IndexOutOfRange {
            line,
            index,
            vertex_count: count,
        });
    }
    Ok(resolved as usize)
}

fn vertex_args(input: &str) -> IResult<&str, Vector3> {
    let (input, (x, y, z)) = tuple((
        preceded(space0, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    // Optional w component is ignored
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn face_args(input: &str) -> IResult<&str, Vec<i64>> {
    preceded(space0, separated_list1(space1, face_ref))(input)
}

/// `i`, `i/t`, `i//n` or `i/t/n`; only the position index is kept
fn face_ref(input: &str) -> IResult<&str, i64> {
    let (input, index) = integer(input)?;
    let (input, _) = opt(preceded(char('/'), opt(integer)))(input)?;
    let (input, _) = opt(preceded(char('/'), opt(integer)))(input)?;
    Ok((input, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE: &str = "\
# unit cube
o cube
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
vn 0 0 1
s off
f 5//1 6//1 7//1 8//1
f 1 4 3 2
f 4/1 8/1 7/1 3/1
f 1/1/1 2/1/1 6/1/1 5/1/1
f 2 3 7 6
f -8 -4 -1 -5
";

    #[test]
    fn test_parse_cube_quads() {
        let mesh = parse_obj(CUBE).unwrap();
        assert_eq!(mesh.topology, Topology::List);
        assert_eq!(mesh.vertices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices[0].position, Vector3::new(-0.5, -0.5, 0.5));
    }

    #[test]
    fn test_negative_indices_resolve_from_end() {
        let mesh = parse_obj(CUBE).unwrap();
        // Last face: -8 -4 -1 -5 => 1 5 8 4
        let last = &mesh.vertices[30..36];
        assert_eq!(last[0].position, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(last[1].position, Vector3::new(-0.5, -0.5, 0.5));
        assert_eq!(last[2].position, Vector3::new(-0.5, 0.5, 0.5));
        assert_eq!(last[5].position, Vector3::new(-0.5, 0.5, -0.5));
    }

    #[test]
    fn test_comments_and_optional_w() {
        let mesh = parse_obj("v 0 0 0 1.0 # origin\nv 1 0 0\nv 0 1 0\nf 1 2 3 # tri\n").unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1].position, Vector3::RIGHT);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
        assert_eq!(
            err,
            ObjError::IndexOutOfRange {
                line: 3,
                index: 3,
                vertex_count: 2
            }
        );
        assert!(matches!(
            parse_obj("v 0 0 0\nf 0 1 1\n"),
            Err(ObjError::IndexOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_syntax_errors_carry_line() {
        let err = parse_obj("v 0 0 0\nv 1 zero 0\n").unwrap_err();
        assert!(matches!(err, ObjError::Syntax { line: 2, .. }));
        assert!(matches!(
            parse_obj("v 0 0 0\nf 1 a\n"),
            Err(ObjError::Syntax { line: 2, .. })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert_eq!(err, ObjError::DegenerateFace { line: 3, corners: 2 });
    }

    #[test]
    fn test_empty_input() {
        let mesh = parse_obj("").unwrap();
        assert!(mesh.vertices.is_empty());
    }
}
