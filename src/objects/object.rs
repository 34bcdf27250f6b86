use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::frames::Frame;
use crate::objects::lexer::{Lexer, Token};
use crate::objects::{Bounds, Position, Triangle};
use crate::FALLBACK_MATERIAL;

/// A named part of the mesh with its own material.
///
/// Topology (`material`, `faces`) comes from the first frame only.
/// `points[k]` holds vertex `k`'s position in every frame, in frame order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub material: Option<String>,
    pub faces: Vec<Triangle>,
    pub points: Vec<Vec<Position>>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        return Group {
            name: name.to_string(),
            ..Group::default()
        };
    }

    pub fn vertex_count(&self) -> usize {
        return self.points.len();
    }
}

/// The assembled animation: groups plus the bounding metrics of all frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub groups: Vec<Group>,
    pub bounds: Bounds,
    pub frames: usize,
}

impl Object {
    /// Runs the assembler over `frames`, the first one providing topology.
    pub fn assemble(frames: &[Frame]) -> Result<Object> {
        let mut assembler = Assembler::new();
        for frame in frames {
            assembler.ingest(frame)?;
        }

        return Ok(assembler.finish());
    }

    pub fn vertex_count(&self) -> usize {
        return self.groups.iter().map(Group::vertex_count).sum();
    }

    pub fn triangle_count(&self) -> usize {
        return self.groups.iter().map(|group| group.faces.len()).sum();
    }
}

/// Position inside a frame while it is being read.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    group: Option<usize>,
    vertex: usize,
}

/// Builds an [`Object`] one frame at a time.
#[derive(Debug, Default)]
pub struct Assembler {
    object: Object,
    /// Group 0 was opened by geometry that came before any `o`/`g`.
    implicit: bool,
}

impl Assembler {
    pub fn new() -> Self {
        return Assembler::default();
    }

    /// Feeds one frame. The first frame fed defines groups, faces and
    /// materials; every frame contributes vertex positions.
    pub fn ingest(&mut self, frame: &Frame) -> Result<()> {
        let topology = self.object.frames == 0;
        let mut cursor = Cursor::default();

        for line in Lexer::new(&frame.lines) {
            match line.token {
                Token::Group(name) => {
                    if !topology {
                        let left = match cursor.group {
                            None if self.implicit => Cursor {
                                group: Some(0),
                                vertex: 0,
                            },
                            _ => cursor,
                        };
                        self.check_group(frame, &left)?;
                    }

                    let group = self.next_group(&cursor);
                    if topology {
                        debug!(group, group_name = name, "opened group");
                        self.object.groups.push(Group::new(name));
                    } else if group >= self.object.groups.len() {
                        return Err(ConvertError::UnexpectedGroup {
                            frame: frame.number,
                            group,
                            groups: self.object.groups.len(),
                        });
                    }

                    cursor = Cursor {
                        group: Some(group),
                        vertex: 0,
                    };
                }

                Token::Vertice(coordinates) => {
                    let position = parse_position(frame, line.row, &coordinates)?;
                    self.object.bounds.include(position);

                    let group = self.current_group(frame, line.row, &mut cursor, topology)?;
                    let points = &mut self.object.groups[group].points;
                    if topology {
                        points.push(vec![position]);
                    } else {
                        let expected = points.len();
                        match points.get_mut(cursor.vertex) {
                            Some(track) => track.push(position),
                            None => {
                                return Err(ConvertError::FrameMismatch {
                                    frame: frame.number,
                                    group,
                                    expected,
                                    found: cursor.vertex + 1,
                                });
                            }
                        }
                    }

                    cursor.vertex += 1;
                }

                Token::Face(vertices) if topology => {
                    let face = parse_face(frame, line.row, &vertices)?;
                    if face.len() < 3 {
                        warn!(file = %frame.name, line = line.row, "face with fewer than 3 vertices skipped");
                    }

                    let group = self.current_group(frame, line.row, &mut cursor, topology)?;
                    self.object.groups[group].faces.extend(triangulate(&face));
                }

                Token::UseMaterial(name) if topology => {
                    let group = self.current_group(frame, line.row, &mut cursor, topology)?;
                    self.object.groups[group].material = Some(name.replace('_', "."));
                }

                _ => {}
            }
        }

        if !topology {
            self.check_group(frame, &cursor)?;

            let first_unvisited = match cursor.group {
                Some(group) => group + 1,
                None => 0,
            };
            for group in first_unvisited..self.object.groups.len() {
                let expected = self.object.groups[group].vertex_count();
                if expected != 0 {
                    return Err(ConvertError::FrameMismatch {
                        frame: frame.number,
                        group,
                        expected,
                        found: 0,
                    });
                }
            }
        }

        self.object.frames += 1;
        debug!(frame = frame.number, groups = self.object.groups.len(), "assembled frame");

        return Ok(());
    }

    /// Applies the material fallback and hands out the result.
    pub fn finish(mut self) -> Object {
        if let [group] = self.object.groups.as_mut_slice() {
            if group.material.is_none() {
                group.material = Some(FALLBACK_MATERIAL.to_string());
            }
        }

        return self.object;
    }

    fn next_group(&self, cursor: &Cursor) -> usize {
        return match cursor.group {
            Some(group) => group + 1,
            None if self.implicit => 1,
            None => 0,
        };
    }

    /// Group that geometry on the current line belongs to, opening the
    /// implicit group when the first frame has not declared one yet.
    fn current_group(
        &mut self,
        frame: &Frame,
        row: usize,
        cursor: &mut Cursor,
        topology: bool,
    ) -> Result<usize> {
        if let Some(group) = cursor.group {
            return Ok(group);
        }

        if topology {
            debug!("geometry before any group, opened implicit group");
            self.object.groups.push(Group::new(""));
            self.implicit = true;
        } else if !self.implicit {
            return Err(ConvertError::parse(
                &frame.name,
                row,
                "geometry before the first group, the first frame has none there",
            ));
        }

        cursor.group = Some(0);
        return Ok(0);
    }

    /// A later frame must leave each group with as many vertices as the
    /// first frame gave it.
    fn check_group(&self, frame: &Frame, cursor: &Cursor) -> Result<()> {
        if let Some(group) = cursor.group {
            let expected = self.object.groups[group].vertex_count();
            if cursor.vertex != expected {
                return Err(ConvertError::FrameMismatch {
                    frame: frame.number,
                    group,
                    expected,
                    found: cursor.vertex,
                });
            }
        }

        return Ok(());
    }
}

fn parse_position(frame: &Frame, row: usize, coordinates: &[&str]) -> Result<Position> {
    if coordinates.len() < 3 {
        return Err(ConvertError::parse(
            &frame.name,
            row,
            format!("vertex needs 3 coordinates, got {}", coordinates.len()),
        ));
    }

    let mut position = [0.0; 3];
    for (i, coordinate) in coordinates[..3].iter().enumerate() {
        position[i] = coordinate.parse::<f64>().map_err(|e| {
            ConvertError::parse(&frame.name, row, format!("invalid coordinate `{coordinate}`: {e}"))
        })?;
    }

    return Ok(position);
}

/// Keeps the position index of each `v/vt/vn` token, converted to 0-based.
fn parse_face(frame: &Frame, row: usize, vertices: &[&str]) -> Result<Vec<usize>> {
    let mut face = Vec::with_capacity(vertices.len());

    for vertex in vertices {
        let index = vertex.split('/').next().unwrap_or(*vertex);
        let index = index.parse::<usize>().map_err(|e| {
            ConvertError::parse(&frame.name, row, format!("invalid face index `{vertex}`: {e}"))
        })?;

        if index == 0 {
            return Err(ConvertError::parse(&frame.name, row, "face indices start at 1"));
        }

        face.push(index - 1);
    }

    return Ok(face);
}

/// Fan triangulation around the first vertex: `n` vertices give `n - 2`
/// triangles, none when `n < 3`.
pub fn triangulate(face: &[usize]) -> Vec<Triangle> {
    let mut triangles = Vec::new();

    for i in 1..face.len().saturating_sub(1) {
        triangles.push([face[0], face[i], face[i + 1]]);
    }

    return triangles;
}
