//! OBJ mesh assembly: line classification, pair-deduplicating assembler and
//! flat upload-ready buffers.

pub mod assembler;
pub mod line;
pub mod mesh;
pub mod obj;

pub use assembler::MeshAssembler;
pub use mesh::MeshBuffers;
pub use obj::{feed_reader, load_obj_from_path, load_obj_from_reader, load_obj_from_str};
