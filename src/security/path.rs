use crate::container::ResourceError;

pub struct ResourcePath;

impl ResourcePath {
    /// Check that a resource path is well formed:
    /// - not empty and not only whitespace
    /// - no backslash separators
    /// - no empty segments (`//`)
    /// - no leading or trailing `/`
    ///
    /// The path is never rewritten; callers get it back exactly as given.
    pub fn validate(path: &str) -> Result<(), ResourceError> {
        if path.trim().is_empty() {
            return Err(ResourceError::EmptyPath);
        }

        let reason = if path.contains('\\') {
            "backslash is not a valid separator"
        } else if path.contains("//") {
            "empty segment ('//')"
        } else if path.starts_with('/') {
            "must not start with '/'"
        } else if path.ends_with('/') {
            "must not end with '/'"
        } else {
            return Ok(());
        };

        Err(ResourceError::InvalidPath {
            path: path.to_string(),
            reason,
        })
    }

    pub fn is_valid(path: &str) -> bool {
        Self::validate(path).is_ok()
    }
}
