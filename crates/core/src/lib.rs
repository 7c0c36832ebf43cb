pub mod codec;
pub mod field_set;
pub mod infer;
pub mod tree;

pub use codec::{flatten, reconstruct};
pub use field_set::{FieldEntry, FlatFieldSet};
pub use infer::infer;
pub use tree::DisplayNode;
