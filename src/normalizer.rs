use scraper::{Html, Node};

/// Extracts the visible text of an HTML document: `script`, `style`, and
/// `noscript` subtrees are dropped, every remaining text run is collapsed
/// and joined with single spaces. html5ever error-recovers while parsing,
/// so malformed markup still yields text instead of aborting the check.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut tokens: Vec<&str> = Vec::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => tokens.extend(text.split_whitespace()),
            Node::Element(element) => {
                if matches!(element.name(), "script" | "style" | "noscript") {
                    continue;
                }
            }
            _ => {}
        }
        // Reversed so the stack pops children in document order.
        for child in node.children().rev() {
            stack.push(child);
        }
    }

    tokens.join(" ")
}
