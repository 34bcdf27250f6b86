use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::frames::Frame;
use crate::objects::lexer::{Lexer, Token};

/// Diffuse colour with alpha, alpha is always `1.0`.
pub type Rgba = [f64; 4];

/// Material name to diffuse colour, read from an MTL file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    colors: HashMap<String, Rgba>,
}

impl MaterialTable {
    pub fn new() -> Self {
        return MaterialTable::default();
    }

    /// Reads `newmtl` / `Kd` pairs. A later `Kd` for the same name wins.
    pub fn parse(file: &Frame) -> Result<MaterialTable> {
        let mut table = MaterialTable::new();
        let mut current: Option<&str> = None;

        for line in Lexer::new(&file.lines) {
            match line.token {
                Token::NewMaterial(name) => {
                    current = Some(name);
                }

                Token::Diffuse(components) => {
                    let color = parse_diffuse(&file.name, line.row, &components)?;

                    let name = match current {
                        Some(name) => name,
                        None => {
                            warn!(file = %file.name, line = line.row, "Kd before any newmtl, stored under an empty name");
                            ""
                        }
                    };

                    table.insert(name, color);
                }

                _ => {}
            }
        }

        debug!(materials = table.len(), "parsed material table");

        return Ok(table);
    }

    pub fn insert(&mut self, name: &str, color: Rgba) {
        self.colors.insert(name.to_string(), color);
    }

    pub fn get(&self, name: &str) -> Option<&Rgba> {
        return self.colors.get(name);
    }

    /// Looks up the colour for `group`'s material.
    pub fn resolve(&self, group: usize, name: &str) -> Result<Rgba> {
        return match self.get(name) {
            Some(color) => Ok(*color),
            None => Err(ConvertError::UnknownMaterial {
                group,
                name: name.to_string(),
            }),
        };
    }

    pub fn len(&self) -> usize {
        return self.colors.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.colors.is_empty();
    }
}

fn parse_diffuse(file: &str, row: usize, components: &[&str]) -> Result<Rgba> {
    if components.len() < 3 {
        return Err(ConvertError::parse(
            file,
            row,
            format!("Kd needs 3 components, got {}", components.len()),
        ));
    }

    let mut color = [0.0, 0.0, 0.0, 1.0];
    for (i, component) in components[..3].iter().enumerate() {
        color[i] = component.parse::<f64>().map_err(|e| {
            ConvertError::parse(file, row, format!("invalid Kd component `{component}`: {e}"))
        })?;
    }

    return Ok(color);
}
