/**
 * Slug Generation
 */

/// Turn a display name into a URL slug: lowercase, runs of
/// non-alphanumeric characters collapse to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Local News"), "local-news");
        assert_eq!(slugify("  Spaces  everywhere  "), "spaces-everywhere");
        assert_eq!(slugify("Already-Slugged"), "already-slugged");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("News & Events!"), "news-events");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn test_slugify_edge_cases() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Ấp Bắc 2026"), "ấp-bắc-2026");
    }
}
