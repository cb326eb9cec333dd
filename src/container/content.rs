use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

/// Lazily opens a readable stream over the resource content
pub type StreamFactory = Box<dyn Fn() -> io::Result<Box<dyn Read + Send>> + Send + Sync>;

/// Lazily writes the resource content into the provided stream
pub type StreamWriter = Box<dyn Fn(&mut dyn Write) -> io::Result<()> + Send + Sync>;

/// Content bound to a resource path
///
/// The builder stores these as-is and never invokes the callables; only
/// consumers of the finished container do.
pub enum ResourceContent {
    Text(String),
    Bytes(Vec<u8>),
    StreamSource(StreamFactory),
    StreamSink(StreamWriter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Text,
    Bytes,
    StreamSource,
    StreamSink,
}

impl ContentKind {
    /// Same name the manifest JSON uses
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Bytes => "bytes",
            ContentKind::StreamSource => "stream-source",
            ContentKind::StreamSink => "stream-sink",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceContent {
    pub fn from_stream_source<F>(factory: F) -> Self
    where
        F: Fn() -> io::Result<Box<dyn Read + Send>> + Send + Sync + 'static,
    {
        ResourceContent::StreamSource(Box::new(factory))
    }

    pub fn from_stream_sink<F>(writer: F) -> Self
    where
        F: Fn(&mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        ResourceContent::StreamSink(Box::new(writer))
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ResourceContent::Text(_) => ContentKind::Text,
            ResourceContent::Bytes(_) => ContentKind::Bytes,
            ResourceContent::StreamSource(_) => ContentKind::StreamSource,
            ResourceContent::StreamSink(_) => ContentKind::StreamSink,
        }
    }

    /// Inline content, if the resource carries it directly
    pub fn as_inline(&self) -> Option<&[u8]> {
        match self {
            ResourceContent::Text(text) => Some(text.as_bytes()),
            ResourceContent::Bytes(bytes) => Some(bytes),
            ResourceContent::StreamSource(_) | ResourceContent::StreamSink(_) => None,
        }
    }

    /// Materialize the content into `out`
    ///
    /// Stream variants call their factory/writer every time; nothing is cached.
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        match self {
            ResourceContent::Text(text) => out.write_all(text.as_bytes()),
            ResourceContent::Bytes(bytes) => out.write_all(bytes),
            ResourceContent::StreamSource(factory) => {
                let mut reader = factory()?;
                io::copy(&mut reader, out)?;
                Ok(())
            }
            ResourceContent::StreamSink(writer) => writer(out),
        }
    }

    /// Convenience over [`write_to`](Self::write_to) collecting into memory
    pub fn to_vec(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

impl fmt::Debug for ResourceContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceContent::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            ResourceContent::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            ResourceContent::StreamSource(_) => f.write_str("StreamSource(..)"),
            ResourceContent::StreamSink(_) => f.write_str("StreamSink(..)"),
        }
    }
}

impl From<String> for ResourceContent {
    fn from(text: String) -> Self {
        ResourceContent::Text(text)
    }
}

impl From<&str> for ResourceContent {
    fn from(text: &str) -> Self {
        ResourceContent::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ResourceContent {
    fn from(bytes: Vec<u8>) -> Self {
        ResourceContent::Bytes(bytes)
    }
}
