use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::{FRAME_PREFIX, MATERIAL_FILE};

/// Raw lines of one input file.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number the file was loaded for.
    pub number: u32,
    /// File name used in error messages.
    pub name: String,
    pub lines: Vec<String>,
}

impl Frame {
    pub fn new(number: u32, name: &str, lines: Vec<String>) -> Self {
        return Frame {
            number,
            name: name.to_string(),
            lines,
        };
    }

    /// Builds a frame from in-memory text.
    pub fn from_text(number: u32, name: &str, text: &str) -> Self {
        return Frame::new(number, name, text.lines().map(String::from).collect());
    }
}

/// Everything read from disk for one conversion.
#[derive(Debug)]
pub struct Loaded {
    pub frames: Vec<Frame>,
    pub material: Frame,
}

/// Where frame files and the shared material file live.
#[derive(Debug, Clone)]
pub struct FrameSource {
    data_dir: PathBuf,
    prefix: String,
    material: String,
}

impl FrameSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        return FrameSource {
            data_dir: data_dir.into(),
            prefix: FRAME_PREFIX.to_string(),
            material: MATERIAL_FILE.to_string(),
        };
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        return self;
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = material.to_string();
        return self;
    }

    /// `<data_dir>/<prefix><number>.obj`, the number written without padding.
    pub fn frame_path(&self, number: u32) -> PathBuf {
        return self.data_dir.join(format!("{}{}.obj", self.prefix, number));
    }

    pub fn material_path(&self) -> PathBuf {
        return self.data_dir.join(&self.material);
    }

    /// Reads frames `start..=end` in order, then the material file.
    pub fn load(&self, start: u32, end: u32) -> Result<Loaded> {
        if start > end {
            return Err(ConvertError::InvalidRange { start, end });
        }

        let mut frames = Vec::new();
        for number in start..=end {
            let path = self.frame_path(number);
            let lines = read_lines(&path)?;
            debug!(path = %path.display(), lines = lines.len(), "loaded frame");
            frames.push(Frame::new(number, &display_name(&path), lines));
        }

        let path = self.material_path();
        let lines = read_lines(&path)?;
        debug!(path = %path.display(), lines = lines.len(), "loaded material file");
        let material = Frame::new(0, &display_name(&path), lines);

        return Ok(Loaded { frames, material });
    }
}

fn display_name(path: &Path) -> String {
    return path.display().to_string();
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line.map_err(|e| ConvertError::io(path, e))?);
    }

    return Ok(lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn frame_names_follow_the_fixed_prefix() {
        let source = FrameSource::new("data");

        assert_eq!(source.frame_path(3), Path::new("data/file_000003.obj"));
        assert_eq!(source.frame_path(12), Path::new("data/file_0000012.obj"));
        assert_eq!(source.material_path(), Path::new("data/file.mtl"));
    }

    #[test]
    fn custom_prefix_and_material() {
        let source = FrameSource::new("in")
            .with_prefix("walk_")
            .with_material("walk.mtl");

        assert_eq!(source.frame_path(7), Path::new("in/walk_7.obj"));
        assert_eq!(source.material_path(), Path::new("in/walk.mtl"));
    }

    #[test]
    fn loads_frames_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file_000002.obj"), "v 2 0 0\n").unwrap();
        fs::write(dir.path().join("file_000003.obj"), "v 3 0 0\nv 4 0 0\n").unwrap();
        fs::write(dir.path().join("file.mtl"), "newmtl a\n").unwrap();

        let loaded = FrameSource::new(dir.path()).load(2, 3).unwrap();

        let numbers: Vec<u32> = loaded.frames.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(loaded.frames[1].lines, vec!["v 3 0 0", "v 4 0 0"]);
        assert_eq!(loaded.material.lines, vec!["newmtl a"]);
    }

    #[test]
    fn missing_frame_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file_000000.obj"), "").unwrap();
        fs::write(dir.path().join("file.mtl"), "").unwrap();

        let err = FrameSource::new(dir.path()).load(0, 1).unwrap_err();

        match err {
            ConvertError::Io { path, .. } => {
                assert!(path.ends_with("file_000001.obj"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_material_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file_000000.obj"), "").unwrap();

        let err = FrameSource::new(dir.path()).load(0, 0).unwrap_err();

        assert!(matches!(err, ConvertError::Io { ref path, .. } if path.ends_with("file.mtl")));
    }

    #[test]
    fn huge_range_fails_on_first_missing_frame() {
        let dir = TempDir::new().unwrap();

        let err = FrameSource::new(dir.path()).load(0, u32::MAX).unwrap_err();

        assert!(matches!(err, ConvertError::Io { ref path, .. } if path.ends_with("file_000000.obj")));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = FrameSource::new("nowhere").load(5, 4).unwrap_err();

        assert!(matches!(err, ConvertError::InvalidRange { start: 5, end: 4 }));
    }
}
