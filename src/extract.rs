use scraper::{Html, Selector};

/// Post-processing applied to the condensed content string before
/// fingerprinting. Implementations must be pure: the same input always
/// produces the same output, or fingerprints become unstable across runs.
pub trait Transform {
    fn apply(&self, content: &str) -> String;
}

/// The default transform: passes content through unmodified.
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, content: &str) -> String {
        content.to_string()
    }
}

/// Extracts and condenses the text of all elements matching `selector`.
///
/// Returns `None` if no element matches. Otherwise the result is the
/// concatenation, in document order, of every whitespace-trimmed text node
/// under the matched elements, skipping nodes that trim to empty. No
/// separator is inserted between fragments; adjacent fragments may merge
/// without a boundary character. That join is deliberate and load-bearing:
/// it determines the fingerprint, and changing it would make every stored
/// fingerprint appear changed.
pub fn extract_text(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);

    let mut matched = false;
    let mut condensed = String::new();

    for element in document.select(selector) {
        matched = true;
        for fragment in element.text() {
            let trimmed = fragment.trim();
            if !trimmed.is_empty() {
                condensed.push_str(trimmed);
            }
        }
    }

    if matched { Some(condensed) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[test]
    fn test_extract_single_element() {
        let html = "<html><body><div class='teaser'>Hello</div></body></html>";
        assert_eq!(
            extract_text(html, &selector("div.teaser")),
            Some("Hello".to_string())
        );
    }

    #[test]
    fn test_extract_strips_whitespace_per_fragment() {
        let html = "<div class='t'>  Hello \n</div>";
        assert_eq!(extract_text(html, &selector("div.t")), Some("Hello".to_string()));
    }

    #[test]
    fn test_extract_joins_fragments_without_separator() {
        // Text from adjacent elements merges directly, with no boundary
        // character between "one" and "two".
        let html = "<ul><li>one</li><li>two</li></ul>";
        assert_eq!(extract_text(html, &selector("li")), Some("onetwo".to_string()));
    }

    #[test]
    fn test_extract_nested_text_in_document_order() {
        let html = "<div class='t'>a <b>b</b> c</div>";
        assert_eq!(extract_text(html, &selector("div.t")), Some("abc".to_string()));
    }

    #[test]
    fn test_extract_skips_whitespace_only_nodes() {
        let html = "<div class='t'><span>  </span><span>x</span></div>";
        assert_eq!(extract_text(html, &selector("div.t")), Some("x".to_string()));
    }

    #[test]
    fn test_extract_no_matches_is_none() {
        let html = "<html><body><p>text</p></body></html>";
        assert_eq!(extract_text(html, &selector("div.missing")), None);
    }

    #[test]
    fn test_extract_matched_but_empty_is_some_empty() {
        // An element that matches but contains no text still counts as a
        // match; the condensed string is simply empty.
        let html = "<div class='t'></div>";
        assert_eq!(extract_text(html, &selector("div.t")), Some(String::new()));
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let condensed = "Hello";
        assert_eq!(Identity.apply(condensed), condensed);
    }

    #[test]
    fn test_identity_transform_preserves_fingerprint() {
        let condensed = "Hello";
        assert_eq!(
            crate::fingerprint::fingerprint(&Identity.apply(condensed)),
            crate::fingerprint::fingerprint(condensed)
        );
    }
}
