/*!
 * Virtual Paths
 * Forward-slash path normalization for the VFS namespace
 *
 * Virtual paths are absolute strings rooted at `/`. Normalization drops `.`
 * and empty segments and resolves `..` lexically; `..` at the root is
 * clamped, so no sequence of segments can climb above `/`.
 */

use crate::core::{VfsError, VfsResult};

pub const ROOT: &str = "/";
pub const SEPARATOR: char = '/';

/// Normalize to an absolute forward-slash path
///
/// Backslashes are treated as separators. Embedded NUL bytes are rejected.
pub fn normalize(path: &str) -> VfsResult<String> {
    if path.contains('\0') {
        return Err(VfsError::InvalidArgument(format!(
            "path contains NUL byte: {:?}",
            path
        )));
    }

    let mut segments: Vec<&str> = Vec::with_capacity(8);
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                // Clamped at the root
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    for segment in &segments {
        out.push(SEPARATOR);
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push(SEPARATOR);
    }
    Ok(out)
}

/// Resolve `relative` against `base`
///
/// An absolute `relative` overrides `base` entirely.
pub fn combine(base: &str, relative: &str) -> VfsResult<String> {
    if relative.starts_with(['/', '\\']) {
        normalize(relative)
    } else {
        normalize(&format!("{}/{}", base, relative))
    }
}

/// Append a single entry name to a normalized directory path
pub fn child(dir: &str, name: &str) -> String {
    if dir == ROOT {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Whether normalized `path` equals `root` or lies below it
pub fn is_within(path: &str, root: &str) -> bool {
    if root == ROOT {
        return path.starts_with(SEPARATOR);
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Last segment of a normalized path (empty for the root)
pub fn basename(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or("")
}

/// Parent of a normalized path; the root is its own parent
pub fn parent(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(0) | None => ROOT,
        Some(idx) => &path[..idx],
    }
}

/// Extension of the basename, without the dot (empty if none)
pub fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}

/// Path with the basename's extension removed
pub fn without_extension(path: &str) -> &str {
    let ext = extension(path);
    if ext.is_empty() {
        path
    } else {
        &path[..path.len() - ext.len() - 1]
    }
}
