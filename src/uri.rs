/// Extracts the trailing identifier segment from a platform resource URI.
///
/// `/api/v1/container/3b0e3f7a/` yields `3b0e3f7a`. URIs without at least a
/// collection and an identifier segment yield None.
pub fn uuid_from_resource_uri(uri: &str) -> Option<&str> {
    let trimmed = uri.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let mut segments = trimmed.rsplit('/');
    let last = segments.next()?;
    segments.next()?;
    Some(last)
}

/// Identifier segment, falling back to the full URI for log lines.
pub fn display_identifier(uri: &str) -> &str {
    uuid_from_resource_uri(uri).unwrap_or(uri)
}
