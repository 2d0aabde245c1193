//! Bundled well-known types.
//!
//! The runtime ships the `google/protobuf/*` schemas as JSON descriptors so
//! they never hit the fetcher. Lookup is by the canonical suffix starting at
//! the last `google/protobuf/` occurrence in the requested path, which makes
//! `proto/google/protobuf/any.proto` and `google/protobuf/any.proto` the
//! same file for dedup purposes.

/// One bundled descriptor.
#[derive(Debug, Clone, Copy)]
pub struct BundledFile {
    /// Canonical name, e.g. `google/protobuf/any.proto`.
    pub name: &'static str,
    /// JSON descriptor source.
    pub source: &'static str,
    /// Canonical names of bundled files this one depends on.
    pub imports: &'static [&'static str],
}

static BUNDLED: &[BundledFile] = &[
    BundledFile {
        name: "google/protobuf/any.proto",
        source: include_str!("../bundled/any.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/api.proto",
        source: include_str!("../bundled/api.json"),
        imports: &[
            "google/protobuf/source_context.proto",
            "google/protobuf/type.proto",
        ],
    },
    BundledFile {
        name: "google/protobuf/descriptor.proto",
        source: include_str!("../bundled/descriptor.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/duration.proto",
        source: include_str!("../bundled/duration.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/empty.proto",
        source: include_str!("../bundled/empty.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/field_mask.proto",
        source: include_str!("../bundled/field_mask.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/source_context.proto",
        source: include_str!("../bundled/source_context.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/struct.proto",
        source: include_str!("../bundled/struct.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/timestamp.proto",
        source: include_str!("../bundled/timestamp.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/type.proto",
        source: include_str!("../bundled/type.json"),
        imports: &[
            "google/protobuf/any.proto",
            "google/protobuf/source_context.proto",
        ],
    },
    BundledFile {
        name: "google/protobuf/wrappers.proto",
        source: include_str!("../bundled/wrappers.json"),
        imports: &[],
    },
    BundledFile {
        name: "google/protobuf/compiler/plugin.proto",
        source: include_str!("../bundled/compiler/plugin.json"),
        imports: &["google/protobuf/descriptor.proto"],
    },
];

/// Returns the canonical bundled name for a path, or `None` if the path's
/// `google/protobuf/` suffix is not a bundled file (or there is no such
/// suffix at all).
#[must_use]
pub fn bundled_file_name(path: &str) -> Option<&'static str> {
    let start = path.rfind("google/protobuf/")?;
    let suffix = &path[start..];
    BUNDLED
        .iter()
        .find(|entry| entry.name == suffix)
        .map(|entry| entry.name)
}

/// Looks up a bundled file by canonical name.
#[must_use]
pub fn bundled(name: &str) -> Option<&'static BundledFile> {
    BUNDLED.iter().find(|entry| entry.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_lookup() {
        assert_eq!(
            bundled_file_name("google/protobuf/timestamp.proto"),
            Some("google/protobuf/timestamp.proto")
        );
        assert_eq!(
            bundled_file_name("proto/vendor/google/protobuf/any.proto"),
            Some("google/protobuf/any.proto")
        );
        assert_eq!(bundled_file_name("google/protobuf/nonsense.proto"), None);
        assert_eq!(bundled_file_name("my/own/file.proto"), None);
    }

    #[test]
    fn test_last_occurrence_wins() {
        assert_eq!(
            bundled_file_name("google/protobuf/google/protobuf/empty.proto"),
            Some("google/protobuf/empty.proto")
        );
    }

    #[test]
    fn test_all_bundled_sources_are_valid_descriptors() {
        for entry in BUNDLED {
            let mut root = ironproto_schema::Root::new();
            root.add_json(entry.source)
                .unwrap_or_else(|e| panic!("{}: {e}", entry.name));
        }
    }

    #[test]
    fn test_bundled_imports_are_bundled() {
        for entry in BUNDLED {
            for import in entry.imports {
                assert!(bundled(import).is_some(), "{}: {import}", entry.name);
            }
        }
    }
}
