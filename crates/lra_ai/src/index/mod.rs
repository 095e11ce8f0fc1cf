pub mod dual;
pub mod lexical;
pub mod similarity;
pub mod vector;

pub use dual::DualIndex;
pub use lexical::LexicalIndex;
pub use vector::{FileVectorStore, VectorStore, VectorStoreStatus};
