use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::objects::{Position, Triangle};

/// One `g` block of a `.3d` file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationGroup {
    pub color: [f64; 3],
    pub points: Vec<Vec<Position>>,
    pub faces: Vec<Triangle>,
}

/// A decoded `.3d` file, laid out the way the renderer loads it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFile {
    pub collision_radius: f64,
    pub collision_y: f64,
    pub groups: Vec<AnimationGroup>,
    /// Position triples per vertex line, `0` when the file has no vertices.
    pub frames: usize,
}

impl AnimationFile {
    pub fn read(path: &Path) -> Result<AnimationFile> {
        let text = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        return AnimationFile::parse(&text);
    }

    pub fn parse(text: &str) -> Result<AnimationFile> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let collision_radius = parse_header(lines.next(), "collision radius")?;
        let collision_y = parse_header(lines.next(), "collision height")?;

        let mut groups: Vec<AnimationGroup> = Vec::new();
        let mut frames: Option<usize> = None;

        for (row, line) in lines {
            let parts: Vec<&str> = line.split_whitespace().collect();

            match parts.first() {
                Some(&"g") => {
                    if parts.len() != 5 {
                        return Err(format_error(row, "group line needs 3 colour components and alpha"));
                    }

                    let mut color = [0.0; 3];
                    for (i, part) in parts[1..4].iter().enumerate() {
                        color[i] = parse_number(row, part)?;
                    }

                    groups.push(AnimationGroup {
                        color,
                        points: Vec::new(),
                        faces: Vec::new(),
                    });
                }

                Some(&"v") => {
                    let values = parts[1..]
                        .iter()
                        .map(|part| parse_number(row, part))
                        .collect::<Result<Vec<f64>>>()?;

                    if values.is_empty() || values.len() % 3 != 0 {
                        return Err(format_error(row, "vertex line needs whole position triples"));
                    }

                    let track: Vec<Position> = values.chunks(3).map(|p| [p[0], p[1], p[2]]).collect();
                    match frames {
                        Some(count) if count != track.len() => {
                            return Err(format_error(
                                row,
                                format!("vertex line has {} frames, expected {count}", track.len()),
                            ));
                        }
                        _ => frames = Some(track.len()),
                    }

                    current(&mut groups, row)?.points.push(track);
                }

                Some(&"f") => {
                    if parts.len() != 4 {
                        return Err(format_error(row, "face line needs 3 indices"));
                    }

                    let mut face = [0; 3];
                    for (i, part) in parts[1..].iter().enumerate() {
                        face[i] = part
                            .parse::<usize>()
                            .map_err(|e| format_error(row, format!("invalid index `{part}`: {e}")))?;
                    }

                    current(&mut groups, row)?.faces.push(face);
                }

                None => {}

                Some(other) => {
                    return Err(format_error(row, format!("unknown directive `{other}`")));
                }
            }
        }

        return Ok(AnimationFile {
            collision_radius,
            collision_y,
            groups,
            frames: frames.unwrap_or(0),
        });
    }

    pub fn vertex_count(&self) -> usize {
        return self.groups.iter().map(|group| group.points.len()).sum();
    }

    pub fn triangle_count(&self) -> usize {
        return self.groups.iter().map(|group| group.faces.len()).sum();
    }
}

fn current(groups: &mut [AnimationGroup], row: usize) -> Result<&mut AnimationGroup> {
    return groups
        .last_mut()
        .ok_or_else(|| format_error(row, "geometry before the first group"));
}

fn parse_header(line: Option<(usize, &str)>, what: &str) -> Result<f64> {
    return match line {
        Some((row, text)) => parse_number(row, text.trim()),
        None => Err(format_error(0, format!("missing {what}"))),
    };
}

fn parse_number(row: usize, text: &str) -> Result<f64> {
    return text
        .parse::<f64>()
        .map_err(|e| format_error(row, format!("invalid number `{text}`: {e}")));
}

fn format_error(line: usize, message: impl Into<String>) -> ConvertError {
    return ConvertError::Format {
        line,
        message: message.into(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_written_layout() {
        let file = AnimationFile::parse(
            "2.5\n\
             0\n\
             g 1.0 0.0 0.0 1\n\
             v 0.0 0.0 0.0 1.0 0.0 0.0\n\
             v 1.0 0.0 0.0 2.0 0.0 0.0\n\
             v 1.0 1.0 0.0 2.0 1.0 0.0\n\
             f 0 1 2\n\
             g 0.0 0.5 1.0 1\n\
             f 2 1 0\n",
        )
        .unwrap();

        assert_eq!(file.collision_radius, 2.5);
        assert_eq!(file.collision_y, 0.0);
        assert_eq!(file.frames, 2);
        assert_eq!(file.groups.len(), 2);
        assert_eq!(file.groups[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(file.groups[0].points[2], vec![[1.0, 1.0, 0.0], [2.0, 1.0, 0.0]]);
        assert_eq!(file.groups[1].faces, vec![[2, 1, 0]]);
        assert_eq!(file.vertex_count(), 3);
        assert_eq!(file.triangle_count(), 2);
    }

    #[test]
    fn rejects_uneven_frame_counts() {
        let err = AnimationFile::parse("1\n1\ng 1 1 1 1\nv 0 0 0\nv 0 0 0 1 1 1\n").unwrap_err();

        assert!(matches!(err, ConvertError::Format { line: 5, .. }));
    }

    #[test]
    fn rejects_vertices_outside_a_group() {
        let err = AnimationFile::parse("1\n1\nv 0 0 0\n").unwrap_err();

        assert!(matches!(err, ConvertError::Format { line: 3, .. }));
    }

    #[test]
    fn rejects_missing_header() {
        let err = AnimationFile::parse("1.5\n").unwrap_err();

        assert!(matches!(err, ConvertError::Format { line: 0, .. }));
    }
}
