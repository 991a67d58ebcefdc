//! Tree path helpers
//!
//! Paths are `/`-separated. Absolute paths start at the root; anything else
//! is resolved against a current directory. `.` and empty segments are
//! dropped, `..` climbs one level and stops at the root.

/// Resolve `path` against `cwd` into a list of segments
pub fn resolve(cwd: &[String], path: &str) -> Vec<String> {
    let mut segments: Vec<String> = if path.starts_with('/') {
        Vec::new()
    } else {
        cwd.to_vec()
    };

    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name.to_string()),
        }
    }

    segments
}

/// Render segments as an absolute path ("/" for the root)
pub fn render(segments: &[String]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        out.push_str(seg);
    }
    out
}

/// Join a child name onto an absolute path
pub fn join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Whether `name` can be stored as a single child name
///
/// Rejects the empty name, `.`, `..` and anything containing `/`, none of
/// which a path could address as one segment.
pub fn is_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}
