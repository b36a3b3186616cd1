//! Core shared types and errors (loader-agnostic).

pub mod error;

pub use error::{FormatError, FormatResult, ObjError, ObjResult};

/// Vertex position (x, y, z) in object space.
pub type Position = [f32; 3];

/// Texture coordinate (u, v).
pub type TexCoord = [f32; 2];

/// Which raw attribute list a face index points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    TexCoord,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Position => f.write_str("position"),
            Attribute::TexCoord => f.write_str("texcoord"),
        }
    }
}
