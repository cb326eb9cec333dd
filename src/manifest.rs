use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{self, Write};

use crate::container::{CodeGenResourceContainer, ContentKind};

/// Serializable summary of a built container
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub display_name: String,
    pub closed: bool,
    pub resource_count: usize,
    pub total_size_bytes: u64,
    pub resources: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub kind: ContentKind,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Counts bytes on their way into the inner writer
struct CountingWriter<W> {
    inner: W,
    len: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, len: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.len += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Manifest {
    /// Describe every resource of the container
    ///
    /// Each content is materialized once, so stream factories and writers run.
    pub fn from_container(container: &CodeGenResourceContainer) -> Result<Self> {
        let mut resources = Vec::with_capacity(container.len());
        let mut total_size_bytes = 0u64;

        for (path, content) in container.iter() {
            let mut digest = CountingWriter::new(Sha256::new());
            content
                .write_to(&mut digest)
                .with_context(|| format!("Failed to read resource content: {}", path))?;
            let size_bytes = digest.len;
            let sha256 = hex::encode(digest.inner.finalize());
            total_size_bytes += size_bytes;

            resources.push(ManifestEntry {
                path: path.to_string(),
                kind: content.kind(),
                size_bytes,
                sha256,
            });
        }

        Ok(Self {
            display_name: container.display_name().to_string(),
            closed: container.is_closed(),
            resource_count: resources.len(),
            total_size_bytes,
            resources,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize manifest")
    }
}
