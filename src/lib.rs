// Public API exports
pub mod container;
pub mod manifest;
pub mod pack;
pub mod security;

// Re-export main types for convenience
pub use container::{
    CodeGenResourceContainer, ContentKind, ErrorKind, ResourceContent, ResourceError,
    ResourceSetBuilder, StreamFactory, StreamWriter,
};
pub use security::ResourcePath;

pub use manifest::{Manifest, ManifestEntry};
pub use pack::{DEFAULT_INLINE_LIMIT, PackOptions, pack_directory};
