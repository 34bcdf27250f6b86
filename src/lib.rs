pub mod error;
pub mod frames;
pub mod materials;
pub mod objects;
pub mod reader;
pub mod writer;

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::frames::FrameSource;
use crate::materials::MaterialTable;
use crate::objects::Object;
use crate::reader::AnimationFile;

pub const DATA_DIR: &str = "data";
pub const FRAME_PREFIX: &str = "file_00000";
pub const MATERIAL_FILE: &str = "file.mtl";
pub const OUTPUT_FILE: &str = "out.3d";

/// Material given to a lone group that never named one.
pub const FALLBACK_MATERIAL: &str = "Mat";

/// Counts reported after a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub groups: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub frames: usize,
}

impl Summary {
    pub fn of(object: &Object) -> Self {
        return Summary {
            groups: object.groups.len(),
            vertices: object.vertex_count(),
            triangles: object.triangle_count(),
            frames: object.frames,
        };
    }

    /// Counts found in a written `.3d` file.
    pub fn of_file(file: &AnimationFile) -> Self {
        return Summary {
            groups: file.groups.len(),
            vertices: file.vertex_count(),
            triangles: file.triangle_count(),
            frames: file.frames,
        };
    }

    /// Whether `read` describes the same animation. A file without vertex
    /// lines carries no frame count, so frames are only compared when there
    /// are vertices.
    pub fn agrees_with(&self, read: &Summary) -> bool {
        let frames = read.vertices == 0 || read.frames == self.frames;

        return frames
            && self.groups == read.groups
            && self.vertices == read.vertices
            && self.triangles == read.triangles;
    }
}

/// Loads frames `start..=end` from `source`, assembles them and writes the
/// result to `output`.
pub fn convert(source: &FrameSource, start: u32, end: u32, output: &Path) -> Result<Summary> {
    let loaded = source.load(start, end)?;

    let materials = MaterialTable::parse(&loaded.material)?;
    let object = Object::assemble(&loaded.frames)?;
    debug!(
        max_radius = object.bounds.max_radius(),
        max_y = object.bounds.max_y(),
        "assembled animation"
    );

    writer::write_file(output, &object, &materials)?;

    return Ok(Summary::of(&object));
}
