mod content;
mod error;


pub use content::{ContentKind, ResourceContent, StreamFactory, StreamWriter};
pub use error::{ErrorKind, ResourceError};

use crate::security::ResourcePath;
use std::io::{self, Read, Write};
use tracing::{debug, trace};

/// Immutable, sorted set of resources produced by [`ResourceSetBuilder`]
///
/// `paths` and `contents` are parallel and ordered by ascending path.
#[derive(Debug)]
pub struct CodeGenResourceContainer {
    display_name: String,
    paths: Box<[String]>,
    contents: Box<[ResourceContent]>,
    closed: bool,
}

/// Fill-once builder for a [`CodeGenResourceContainer`]
///
/// The number of resources is declared up front and every resource must be
/// added in strictly ascending (ordinal) path order.
pub struct ResourceSetBuilder {
    paths: Vec<String>,
    contents: Vec<ResourceContent>,
    capacity: usize,
    built: bool,
}

impl ResourceSetBuilder {
    /// Create a builder for exactly `count` resources
    pub fn new(count: usize) -> Result<Self, ResourceError> {
        if count == 0 {
            return Err(ResourceError::InvalidCount(count));
        }
        Ok(Self {
            paths: Vec::with_capacity(count),
            contents: Vec::with_capacity(count),
            capacity: count,
            built: false,
        })
    }

    /// Add the next resource as string content
    pub fn add_text(
        &mut self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), ResourceError> {
        self.add(path, ResourceContent::Text(content.into()))
    }

    /// Add the next resource as binary content
    pub fn add_bytes(
        &mut self,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), ResourceError> {
        self.add(path, ResourceContent::Bytes(content.into()))
    }

    /// Add the next resource as a function that opens its stream on demand
    pub fn add_stream_source<F>(
        &mut self,
        path: impl Into<String>,
        factory: F,
    ) -> Result<(), ResourceError>
    where
        F: Fn() -> io::Result<Box<dyn Read + Send>> + Send + Sync + 'static,
    {
        self.add(path, ResourceContent::from_stream_source(factory))
    }

    /// Add the next resource as a function that writes its content on demand
    pub fn add_stream_sink<F>(
        &mut self,
        path: impl Into<String>,
        writer: F,
    ) -> Result<(), ResourceError>
    where
        F: Fn(&mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        self.add(path, ResourceContent::from_stream_sink(writer))
    }

    /// Add the next resource
    ///
    /// All checks run before anything is stored, so a rejected call leaves
    /// the builder untouched.
    pub fn add(
        &mut self,
        path: impl Into<String>,
        content: ResourceContent,
    ) -> Result<(), ResourceError> {
        if self.built {
            return Err(ResourceError::AlreadyBuilt);
        }

        let path = path.into();
        ResourcePath::validate(&path)?;

        if let Some(previous) = self.paths.last() {
            // Byte-wise comparison: equal paths are rejected too
            if previous.as_str() >= path.as_str() {
                return Err(ResourceError::OutOfOrder {
                    previous: previous.clone(),
                    path,
                });
            }
        }

        if self.paths.len() >= self.capacity {
            return Err(ResourceError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        trace!(path = %path, kind = ?content.kind(), slot = self.paths.len(), "resource added");
        self.paths.push(path);
        self.contents.push(content);
        Ok(())
    }

    /// Build a closed container
    pub fn build_closed(
        &mut self,
        display_name: &str,
    ) -> Result<CodeGenResourceContainer, ResourceError> {
        self.build(display_name, true)
    }

    /// Create the resource container
    ///
    /// Can succeed only once, and only after every declared resource has been
    /// added. Pass `closed = false` to leave the container open.
    pub fn build(
        &mut self,
        display_name: &str,
        closed: bool,
    ) -> Result<CodeGenResourceContainer, ResourceError> {
        if self.built {
            return Err(ResourceError::AlreadyBuilt);
        }
        if display_name.trim().is_empty() {
            return Err(ResourceError::EmptyDisplayName);
        }
        if self.paths.len() != self.capacity {
            return Err(ResourceError::Incomplete {
                added: self.paths.len(),
                expected: self.capacity,
            });
        }

        self.built = true;
        debug!(
            display_name,
            closed,
            count = self.capacity,
            "resource container built"
        );

        Ok(CodeGenResourceContainer {
            display_name: display_name.to_string(),
            paths: std::mem::take(&mut self.paths).into_boxed_slice(),
            contents: std::mem::take(&mut self.contents).into_boxed_slice(),
            closed,
        })
    }

    /// Number of resources added so far
    ///
    /// Storage moves into the container on build; a built builder was full.
    pub fn len(&self) -> usize {
        if self.built {
            self.capacity
        } else {
            self.paths.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of resources declared at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_built(&self) -> bool {
        self.built
    }
}

impl CodeGenResourceContainer {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Resource paths in ascending order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Resource contents, parallel to [`paths`](Self::paths)
    pub fn contents(&self) -> &[ResourceContent] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Walk resources in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceContent)> {
        self.paths
            .iter()
            .map(String::as_str)
            .zip(self.contents.iter())
    }
}
