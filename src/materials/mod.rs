pub mod material;

pub use material::{MaterialTable, Rgba};
