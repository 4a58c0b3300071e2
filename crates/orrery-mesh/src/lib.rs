//! Model loading: the OBJ reader and the flat triangle mesh it produces.

pub mod mesh;
pub mod obj;

pub use mesh::{Mesh, MeshVertex};
pub use obj::{AttributeKind, MAX_LINE_LEN, ParseError, load_obj, parse_obj};
