use crate::error::RegistryError;

/// Splits an absolute registry path into its segments.
///
/// Paths are `/`-separated and absolute. A trailing slash is tolerated. Empty
/// segments, `.`/`..`, segments starting with `.` and segments containing a
/// backslash are rejected so that every node maps onto exactly one directory.
pub(crate) fn segments(path: &str) -> Result<Vec<&str>, RegistryError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(RegistryError::InvalidPath {
            message: path.to_owned().into(),
            context: Some("Registry paths must be absolute".into()),
        });
    };

    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    rest.split('/')
        .map(|seg| {
            if seg.is_empty() || seg.starts_with('.') || seg.contains('\\') {
                Err(RegistryError::InvalidPath {
                    message: path.to_owned().into(),
                    context: Some(format!("Illegal segment '{seg}'").into()),
                })
            } else {
                Ok(seg)
            }
        })
        .collect()
}

/// Canonical string form (`/a/b`, root is `/`).
pub(crate) fn normalize(path: &str) -> Result<String, RegistryError> {
    let segs = segments(path)?;
    Ok(format!("/{}", segs.join("/")))
}

/// Every proper ancestor of a normalized path, root excluded, shallowest first.
pub(crate) fn ancestors(normalized: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut idx = 0;
    while let Some(pos) = normalized[idx + 1..].find('/') {
        idx += pos + 1;
        out.push(normalized[..idx].to_owned());
    }
    out
}
