//! OBJ loaders: drive a [`MeshAssembler`] over a line source.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use meshcore::{ObjError, ObjResult};

use crate::{assembler::MeshAssembler, mesh::MeshBuffers};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshBuffers> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let mesh = load_obj_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> ObjResult<MeshBuffers> {
    let mut assembler = MeshAssembler::new();
    feed_reader(&mut assembler, reader)?;
    Ok(assembler.into_buffers())
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> ObjResult<MeshBuffers> {
    load_obj_from_reader(io::Cursor::new(contents))
}

/// Feed every line of `reader` into `assembler`, stopping at the first error.
///
/// The assembler keeps whatever earlier lines contributed, so several sources
/// can be fed in sequence.
pub fn feed_reader<R: BufRead>(assembler: &mut MeshAssembler, reader: R) -> ObjResult<()> {
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ObjError::Io {
            line: line_no + 1,
            source,
        })?;
        assembler
            .feed_line(&line)
            .map_err(|source| ObjError::Parse {
                line: line_no + 1,
                source,
            })?;
    }

    log::debug!(
        "OBJ source consumed: {} positions, {} texcoords, {} unique vertices, {} indices",
        assembler.raw_position_count(),
        assembler.raw_texcoord_count(),
        assembler.pair_count(),
        assembler.index_count()
    );
    Ok(())
}
