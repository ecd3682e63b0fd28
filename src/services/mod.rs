pub mod metadata;
pub mod providers;
pub mod similarity;

pub use metadata::MetadataService;
pub use similarity::SimilarityIndex;
