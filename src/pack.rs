use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::container::{CodeGenResourceContainer, ResourceSetBuilder};

/// Files up to this size are embedded inline
pub const DEFAULT_INLINE_LIMIT: u64 = 64 * 1024;

/// How a directory is turned into a resource container
#[derive(Debug, Clone)]
pub struct PackOptions {
    inline_limit: u64,
    include_hidden: bool,
    follow_links: bool,
    closed: bool,
}

impl PackOptions {
    pub fn new() -> Self {
        Self {
            inline_limit: DEFAULT_INLINE_LIMIT,
            include_hidden: false,
            follow_links: false,
            closed: true,
        }
    }

    /// Set the largest file size embedded inline; bigger files are streamed
    pub fn inline_limit(mut self, bytes: u64) -> Self {
        self.inline_limit = bytes;
        self
    }

    /// Include files and directories whose name starts with '.'
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Leave the container open (`false`) or closed (`true`, the default)
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A file found under the packed root
#[derive(Debug, Clone)]
struct PackEntry {
    resource_path: String,
    file_path: PathBuf,
    size: u64,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Turn a path relative to the root into a '/'-separated resource path
fn resource_path(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| anyhow!("Invalid UTF-8 in file name: {}", relative.display()))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Walk `root` and collect its files, sorted by resource path
fn collect_entries(root: &Path, options: &PackOptions) -> Result<Vec<PackEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(options.follow_links)
        .into_iter()
        .filter_entry(|e| options.include_hidden || !is_hidden(e))
    {
        let entry = entry.context("Failed to read directory entry")?;

        if !entry.file_type().is_file() {
            if entry.file_type().is_symlink() {
                warn!(path = %entry.path().display(), "skipping symbolic link");
            }
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is not under {}", entry.path().display(), root.display()))?;
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to get metadata for {}", entry.path().display()))?;

        entries.push(PackEntry {
            resource_path: resource_path(relative)?,
            file_path: entry.path().to_path_buf(),
            size: metadata.len(),
        });
    }

    // Ordinal order, as the builder requires
    entries.sort_by(|a, b| a.resource_path.cmp(&b.resource_path));
    Ok(entries)
}

/// Pack every file under `root` into a resource container
///
/// Small files are read now and stored inline (as text when they are valid
/// UTF-8). Larger files are stored as stream sources that reopen the file
/// each time the content is requested.
pub fn pack_directory(
    root: &Path,
    display_name: &str,
    options: &PackOptions,
) -> Result<CodeGenResourceContainer> {
    info!(root = %root.display(), display_name, "packing resources");

    if !root.is_dir() {
        return Err(anyhow!("Not a directory: {}", root.display()));
    }

    let entries = collect_entries(root, options)
        .with_context(|| format!("Failed to scan directory: {}", root.display()))?;

    let mut builder = ResourceSetBuilder::new(entries.len())
        .with_context(|| format!("No resources to pack under {}", root.display()))?;

    for entry in entries {
        let path = entry.resource_path.as_str();

        if entry.size <= options.inline_limit {
            let data = fs::read(&entry.file_path)
                .with_context(|| format!("Failed to read file: {}", entry.file_path.display()))?;
            let added = match String::from_utf8(data) {
                Ok(text) => builder.add_text(path, text),
                Err(err) => builder.add_bytes(path, err.into_bytes()),
            };
            added.with_context(|| format!("Failed to add resource '{}'", path))?;
            debug!(path, size = entry.size, "inlined resource");
        } else {
            let file_path = entry.file_path.clone();
            builder
                .add_stream_source(path, move || {
                    let file = File::open(&file_path)?;
                    Ok(Box::new(file) as Box<dyn Read + Send>)
                })
                .with_context(|| format!("Failed to add resource '{}'", path))?;
            debug!(path, size = entry.size, "streamed resource");
        }
    }

    let container = builder
        .build(display_name, options.closed)
        .context("Failed to build resource container")?;

    info!(count = container.len(), "resource container ready");
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, data: &[u8]) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, data).unwrap();
    }

    #[test]
    fn test_pack_sorted_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "b.txt", b"bee");
        write(&dir, "a/z.txt", b"zed");
        write(&dir, "a/b/c.txt", b"sea");
        write(&dir, "B.txt", b"upper");

        let container = pack_directory(dir.path(), "files", &PackOptions::default()).unwrap();
        assert_eq!(
            container.paths(),
            &[
                "B.txt".to_string(),
                "a/b/c.txt".to_string(),
                "a/z.txt".to_string(),
                "b.txt".to_string(),
            ]
        );
        assert_eq!(container.display_name(), "files");
        assert!(container.is_closed());
    }

    #[test]
    fn test_text_bytes_and_stream_selection() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "big.txt", &[b'x'; 32]);
        write(&dir, "bin.dat", &[0xff, 0xfe, 0x00]);
        write(&dir, "small.txt", b"hi");

        let options = PackOptions::new().inline_limit(16);
        let container = pack_directory(dir.path(), "kinds", &options).unwrap();
        let kinds: Vec<ContentKind> = container.contents().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![ContentKind::StreamSource, ContentKind::Bytes, ContentKind::Text]
        );

        // Streamed content is read from disk on demand
        assert_eq!(container.contents()[0].to_vec().unwrap(), vec![b'x'; 32]);
    }

    #[test]
    fn test_hidden_entries_skipped_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, ".git/config", b"[core]");
        write(&dir, ".env", b"KEY=1");
        write(&dir, "visible.txt", b"ok");

        let container = pack_directory(dir.path(), "hidden", &PackOptions::default()).unwrap();
        assert_eq!(container.paths(), &["visible.txt".to_string()]);

        let options = PackOptions::new().include_hidden(true);
        let container = pack_directory(dir.path(), "hidden", &options).unwrap();
        assert_eq!(container.len(), 3);
        assert_eq!(container.paths()[0], ".env");
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = pack_directory(dir.path(), "empty", &PackOptions::default()).unwrap_err();
        assert!(err.to_string().contains("No resources to pack"));
    }

    #[test]
    fn test_blank_display_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", b"a");
        let result = pack_directory(dir.path(), "  ", &PackOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_open_container_option() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", b"a");
        let options = PackOptions::new().closed(false);
        let container = pack_directory(dir.path(), "open", &options).unwrap();
        assert!(!container.is_closed());
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "file.txt", b"data");

        let err = pack_directory(&dir.path().join("file.txt"), "file", &PackOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Not a directory"));

        let err = pack_directory(&dir.path().join("missing"), "missing", &PackOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Not a directory"));
    }

    #[test]
    fn test_streamed_file_is_reopened_on_every_read() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "big.txt", b"first version");

        let options = PackOptions::new().inline_limit(4);
        let container = pack_directory(dir.path(), "reread", &options).unwrap();
        let content = &container.contents()[0];
        assert_eq!(content.kind(), ContentKind::StreamSource);
        assert_eq!(content.to_vec().unwrap(), b"first version");

        write(&dir, "big.txt", b"second version, longer");
        assert_eq!(content.to_vec().unwrap(), b"second version, longer");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_fails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"bad\xff.txt");
        fs::write(dir.path().join(name), b"data").unwrap();

        let err = pack_directory(dir.path(), "names", &PackOptions::default()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("Invalid UTF-8"), "unexpected error: {}", chain);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_unless_followed() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "real.txt", b"real");
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let container = pack_directory(dir.path(), "links", &PackOptions::default()).unwrap();
        assert_eq!(container.paths(), &["real.txt".to_string()]);

        let options = PackOptions::new().follow_links(true);
        let container = pack_directory(dir.path(), "links", &options).unwrap();
        assert_eq!(
            container.paths(),
            &["link.txt".to_string(), "real.txt".to_string()]
        );
        assert_eq!(container.contents()[0].as_inline().unwrap(), b"real");
    }

    #[test]
    fn test_resource_path_uses_forward_slashes() {
        let relative = Path::new("a").join("b").join("c.txt");
        assert_eq!(resource_path(&relative).unwrap(), "a/b/c.txt");
    }
}
