//! Catalog services: cache access, the read resolver and the write pipeline.

pub mod cache_context;
pub mod mutation_pipeline;
pub mod resolver;

pub use cache_context::CacheContext;
pub use mutation_pipeline::{
    AddAlbumInput, AddArtistInput, AddCompanyInput, EditAlbumInput, EditArtistInput, EditCompanyInput,
    MutationPipeline,
};
pub use resolver::CatalogResolver;
