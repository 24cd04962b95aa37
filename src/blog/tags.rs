// Tag parsing and the process-wide tag registry

/// Every distinct tag seen since startup, in first-seen order.
///
/// Lives only in memory; a restart begins again from the configured seed.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: Vec<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for tag in seed {
            registry.register(tag.as_ref());
        }
        registry
    }

    /// Record a tag (lowercased). Returns `true` if it was not seen before.
    pub fn register(&mut self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn register_all(&mut self, tags: &[String]) {
        for tag in tags {
            self.register(tag);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Tags from the create form: split on ", " when present.
pub fn parse_create_tags(raw: &str) -> Vec<String> {
    split_tags(raw, ", ")
}

/// Tags from the edit form: split on "," when present.
///
/// Differs from [`parse_create_tags`]; "a, b" keeps the leading space on "b".
pub fn parse_edit_tags(raw: &str) -> Vec<String> {
    split_tags(raw, ",")
}

fn split_tags(raw: &str, separator: &str) -> Vec<String> {
    // An empty field means no tags, not a single "" tag
    if raw.is_empty() {
        return Vec::new();
    }
    if raw.contains(separator) {
        raw.split(separator).map(str::to_lowercase).collect()
    } else {
        vec![raw.to_lowercase()]
    }
}
