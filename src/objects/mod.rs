pub mod bounds;
pub mod lexer;
pub mod object;

pub use bounds::Bounds;
pub use object::{Assembler, Group, Object};

/// One vertex position `(x, y, z)` in a single frame.
pub type Position = [f64; 3];

/// Three 0-based vertex indices.
pub type Triangle = [usize; 3];
