use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::materials::{MaterialTable, Rgba};
use crate::objects::Object;

/// Resolves every group's material up front so a missing name fails before
/// the output file is touched.
pub fn resolve_colors(object: &Object, materials: &MaterialTable) -> Result<Vec<Rgba>> {
    let mut colors = Vec::with_capacity(object.groups.len());

    for (i, group) in object.groups.iter().enumerate() {
        let name = group.material.as_deref().unwrap_or_default();
        colors.push(materials.resolve(i, name)?);
    }

    return Ok(colors);
}

/// Writes the `.3d` text for `object`, `colors[i]` being group `i`'s colour.
pub fn write_to<W: Write>(out: &mut W, object: &Object, colors: &[Rgba]) -> io::Result<()> {
    writeln!(out, "{}", format_metric(object.bounds.radius()))?;
    writeln!(out, "{}", format_metric(object.bounds.height()))?;

    for (group, color) in object.groups.iter().zip(colors) {
        writeln!(
            out,
            "g {} {} {} 1",
            format_float(color[0]),
            format_float(color[1]),
            format_float(color[2])
        )?;

        for track in &group.points {
            let mut line = String::from("v");
            for [x, y, z] in track {
                line.push(' ');
                line.push_str(&format_float(*x));
                line.push(' ');
                line.push_str(&format_float(*y));
                line.push(' ');
                line.push_str(&format_float(*z));
            }
            writeln!(out, "{line}")?;
        }

        for [a, b, c] in &group.faces {
            writeln!(out, "f {a} {b} {c}")?;
        }
    }

    return Ok(());
}

/// Creates or truncates `path` and writes `object` into it.
pub fn write_file(path: &Path, object: &Object, materials: &MaterialTable) -> Result<()> {
    let colors = resolve_colors(object, materials)?;

    let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_to(&mut out, object, &colors).map_err(|e| ConvertError::io(path, e))?;
    out.flush().map_err(|e| ConvertError::io(path, e))?;

    debug!(path = %path.display(), groups = colors.len(), "wrote animation");

    return Ok(());
}

/// A bounding metric that never left its baseline is written as a bare `0`.
fn format_metric(metric: Option<f64>) -> String {
    return match metric {
        Some(value) => format_float(value),
        None => "0".to_string(),
    };
}

/// Shortest round-trip digits, always marked as a float.
///
/// Plain notation while the decimal exponent is in `-4..16`, otherwise
/// `d.ddde±XX` with at least two exponent digits. When two digit strings of
/// the shortest length both round-trip, the one nearest the exact value is
/// used, and an exact tie goes to the even last digit.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Exact formatting at the shortest length rounds half to even.
    let precision = significant_digits(&format!("{value:e}")).saturating_sub(1);
    let scientific = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let mut digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }

    if !(-4..16).contains(&exponent) {
        let (lead, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() { String::new() } else { format!(".{rest}") };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{lead}{fraction}e{exponent_sign}{:02}", exponent.abs());
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let point = exponent as usize + 1;
    if digits.len() <= point {
        let zeros = "0".repeat(point - digits.len());
        return format!("{sign}{digits}{zeros}.0");
    }

    let (whole, fraction) = digits.split_at(point);
    return format!("{sign}{whole}.{fraction}");
}

fn significant_digits(scientific: &str) -> usize {
    let mantissa = scientific.split('e').next().unwrap_or(scientific);
    return mantissa.chars().filter(char::is_ascii_digit).count();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::Frame;

    #[test]
    fn formats_like_existing_files() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.8), "0.8");
        assert_eq!(format_float(-3.25), "-3.25");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1234.5), "1234.5");
        assert_eq!(format_float(120.0), "120.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00012), "0.00012");
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(format_float(-1914238122952880.25), "-1914238122952880.2");
        assert_eq!(format_float(1000000000000000.25), "1000000000000000.2");
        assert_eq!(format_float(1000000000000000.75), "1000000000000000.8");
    }

    #[test]
    fn formats_extreme_exponents() {
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-2.5e-7), "-2.5e-07");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e300), "1.5e+300");
        assert_eq!(format_float(123456789012345.0), "123456789012345.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    fn object(text: &str) -> Object {
        return Object::assemble(&[Frame::from_text(0, "file_000000.obj", text)]).unwrap();
    }

    #[test]
    fn writes_groups_vertices_and_faces() {
        let object = object("o a\nusemtl red\nv 1 2 3\nv -4 0.5 0\nv 0 0 1\nf 1 2 3\n");
        let colors = vec![[1.0, 0.0, 0.25, 1.0]];

        let mut out = Vec::new();
        write_to(&mut out, &object, &colors).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "4.0\n\
             2.0\n\
             g 1.0 0.0 0.25 1\n\
             v 1.0 2.0 3.0\n\
             v -4.0 0.5 0.0\n\
             v 0.0 0.0 1.0\n\
             f 0 1 2\n"
        );
    }

    #[test]
    fn untouched_metrics_are_written_as_integers() {
        let object = object("o a\nusemtl red\nv 0 -1 0\n");

        let mut out = Vec::new();
        write_to(&mut out, &object, &[[0.5, 0.5, 0.5, 1.0]]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("0\n0\ng 0.5 0.5 0.5 1\n"));
    }

    #[test]
    fn unknown_material_fails_before_writing() {
        let object = object("o a\nusemtl missing\nv 0 0 0\n");
        let materials = MaterialTable::new();

        let err = resolve_colors(&object, &materials).unwrap_err();

        assert!(matches!(err, ConvertError::UnknownMaterial { group: 0, ref name } if name == "missing"));
    }
}
