pub mod builder;
pub mod extractor;
pub mod workdir;

pub use builder::ArchiveBuilder;
pub use extractor::ArchiveExtractor;
pub use workdir::WorkingTree;
