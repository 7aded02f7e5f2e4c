pub mod resolver;

pub use resolver::{BinaryResolver, PathBinaryResolver};
