//! Import path resolution.
//!
//! Import paths are forward-slash strings, not OS paths; backslashes are
//! folded and `.`/`..` segments collapse the way the wider protobuf
//! toolchain expects.

/// Returns true for rooted paths (`/x`) and scheme/drive prefixes (`c:/x`).
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    match path.split('/').next() {
        Some(first) => {
            first.ends_with(':')
                && first.len() > 1
                && first[..first.len() - 1]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Collapses `.`, `..`, duplicate separators, and backslashes.
#[must_use]
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = is_absolute(&path);
    let rooted = path.starts_with('/');
    // A drive/scheme prefix stays in `parts` and can never be popped.
    let floor = usize::from(absolute && !rooted);

    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.len() > floor && parts.last() != Some(&"..") {
                    parts.pop();
                } else if !absolute {
                    parts.push(part);
                }
            }
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if rooted { format!("/{joined}") } else { joined }
}

/// Resolves an import target against the file that declared it. Absolute
/// targets normalize as-is; relative targets are joined to the origin's
/// directory.
#[must_use]
pub fn resolve(origin: &str, target: &str) -> String {
    if is_absolute(target) {
        return normalize(target);
    }
    match origin.rsplit_once('/') {
        Some((dir, _)) => normalize(&format!("{dir}/{target}")),
        None => normalize(target),
    }
}
