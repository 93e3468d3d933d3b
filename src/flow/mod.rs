pub mod document;
pub mod edge;
pub mod graph;
pub mod kind;
pub mod node;

pub use document::*;
pub use edge::*;
pub use kind::*;
pub use node::*;
