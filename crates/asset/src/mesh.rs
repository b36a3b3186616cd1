//! Flat, upload-ready buffers produced by the assembler.

use meshcore::{Position, TexCoord};

/// Indexed triangle mesh as three flat arrays.
///
/// `positions` has stride 3, `texcoords` stride 2, and every entry in
/// `indices` addresses one (position, texcoord) pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub indices: Vec<u32>,
    pub object_name: Option<String>,
    pub material_library: Option<String>,
}

impl MeshBuffers {
    /// Number of unique (position, texcoord) pairs.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }

    pub fn vertex(&self, i: usize) -> Option<(Position, TexCoord)> {
        let p = self.positions.get(i * 3..i * 3 + 3)?;
        let t = self.texcoords.get(i * 2..i * 2 + 2)?;
        Some(([p[0], p[1], p[2]], [t[0], t[1]]))
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn texcoord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texcoords)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
