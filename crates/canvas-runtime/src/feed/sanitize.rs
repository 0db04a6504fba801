use ego_tree::NodeRef;
use scraper::{Html, Node};

const ALLOWED_TAGS: &[&str] = &["p", "br", "strong", "em", "ul", "ol", "li", "a", "h3"];

/// Tags whose content is never user-visible markup (script/style bodies
/// are raw JS/CSS, not prose) — dropped entirely rather than unwrapped.
const OPAQUE_TAGS: &[&str] = &["script", "style"];

/// Strip every tag not in the §4.6 allowlist (`p, br, strong, em, ul, ol,
/// li, a, h3`) before a feed item's description is emitted; keep `href`
/// on `a`, drop every other attribute including event handlers and
/// inline styles. Disallowed tags are unwrapped, not dropped — their
/// text content survives — except `script`/`style`, whose entire
/// subtree (raw JS/CSS, not prose) is dropped.
pub fn sanitize_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::new();
    for child in fragment.root_element().children() {
        render_node(child, &mut out);
    }
    out
}

fn render_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let tag = element.name();
            if OPAQUE_TAGS.contains(&tag) {
                return;
            }
            let keep = ALLOWED_TAGS.contains(&tag);

            if keep {
                if tag == "a" {
                    match element.attr("href") {
                        Some(href) => out.push_str(&format!("<a href=\"{}\">", escape_attr(href))),
                        None => out.push_str("<a>"),
                    }
                } else {
                    out.push('<');
                    out.push_str(tag);
                    out.push('>');
                }
            }

            for child in node.children() {
                render_node(child, out);
            }

            if keep && tag != "br" {
                out.push_str(&format!("</{tag}>"));
            }
        }
        _ => {}
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed_tags_and_href() {
        let input = r#"<p>See <a href="https://example.com" onclick="evil()">here</a></p>"#;
        let out = sanitize_html(input);
        assert!(out.contains("<a href=\"https://example.com\">here</a>"));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn strips_disallowed_tags_but_keeps_text() {
        let input = r#"<div class="x"><script>evil()</script><p>Safe text</p></div>"#;
        let out = sanitize_html(input);
        assert!(!out.contains("<div"));
        assert!(!out.contains("<script"));
        assert!(out.contains("<p>Safe text</p>"));
        assert!(!out.contains("evil()"));
    }

    #[test]
    fn list_structure_is_preserved() {
        let input = "<ul><li>One</li><li>Two</li></ul>";
        assert_eq!(sanitize_html(input), "<ul><li>One</li><li>Two</li></ul>");
    }

    #[test]
    fn br_is_not_closed() {
        let input = "<p>Line one<br>Line two</p>";
        assert_eq!(sanitize_html(input), "<p>Line one<br>Line two</p>");
    }

    #[test]
    fn script_and_style_bodies_are_dropped_not_unwrapped() {
        let input = r#"<p>Before</p><style>.x{color:red}</style><script>alert(1)</script><p>After</p>"#;
        let out = sanitize_html(input);
        assert_eq!(out, "<p>Before</p><p>After</p>");
    }
}
