pub mod chunker;

pub use chunker::ChunkSource;
