//! cardlist-render-html — Render DomNode trees to HTML strings
//!
//! Used for the static host page and for checking rendered cards against
//! their expected markup.

use cardlist_dom::DomNode;

/// Void elements that must not have closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Render a DomNode tree to an HTML string.
pub fn render_to_html(node: &DomNode) -> String {
    let mut buf = String::with_capacity(1024);
    write_node(node, &mut buf);
    buf
}

/// Options for rendering the host page.
pub struct PageOptions {
    /// Content of `<body>`; must contain the input, trigger and output elements.
    pub body: DomNode,
    pub title: Option<String>,
    pub styles: Vec<String>,
    /// wasm-bindgen `--target web` loaders; each is imported and its default
    /// `init()` export called.
    pub wasm_modules: Vec<String>,
    /// Serialized config, embedded as `<script type="application/json">`.
    pub config_json: Option<String>,
    /// Element id for the embedded config block.
    pub config_element_id: String,
}

impl PageOptions {
    pub fn new(body: DomNode) -> Self {
        Self {
            body,
            title: None,
            styles: Vec::new(),
            wasm_modules: Vec::new(),
            config_json: None,
            config_element_id: "cardlist-config".to_string(),
        }
    }
}

/// Render a full HTML page.
pub fn render_page(opts: &PageOptions) -> String {
    let body_html = render_to_html(&opts.body);

    let mut html = String::with_capacity(body_html.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");

    if let Some(title) = &opts.title {
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    }

    for href in &opts.styles {
        html.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\" />\n", escape_attr(href)));
    }

    if let Some(json) = &opts.config_json {
        html.push_str(&format!(
            "<script type=\"application/json\" id=\"{}\">{}</script>\n",
            escape_attr(&opts.config_element_id),
            escape_script(json)
        ));
    }

    // Module scripts are deferred, so the body is parsed before the app mounts.
    for src in &opts.wasm_modules {
        html.push_str("<script type=\"module\">\n");
        html.push_str(&format!("import init from \"{}\";\n", escape_script(&escape_js_string(src))));
        html.push_str("init();\n</script>\n");
    }

    html.push_str("</head>\n");
    html.push_str(&body_html);
    html.push_str("\n</html>");
    html
}

fn write_node(node: &DomNode, buf: &mut String) {
    if node.is_text() {
        if let Some(text) = &node.text {
            buf.push_str(&escape_html(text));
        }
        return;
    }

    let is_void = VOID_ELEMENTS.contains(&node.tag.as_str());

    buf.push('<');
    buf.push_str(&node.tag);

    // Attributes are an ordered map, so output is deterministic.
    if let Some(attrs) = &node.attrs {
        for (k, v) in attrs {
            buf.push(' ');
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(v));
            buf.push('"');
        }
    }

    buf.push('>');

    if let Some(text) = &node.text {
        buf.push_str(&escape_html(text));
    }

    for child in node.children_iter() {
        write_node(child, buf);
    }

    if !is_void {
        buf.push_str("</");
        buf.push_str(&node.tag);
        buf.push('>');
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// JSON inside a script element only needs `</` broken up.
fn escape_script(s: &str) -> String {
    s.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardlist_dom::DomNode;

    fn card(text: &str, index: &str) -> DomNode {
        DomNode::element("div")
            .with_attr("class", "text-bg-primary p-3 mb-3 rounded w-75")
            .with_attr("data-message", index)
            .with_child(DomNode::text_node(text))
    }

    #[test]
    fn test_card_markup() {
        assert_eq!(
            render_to_html(&card("hello", "0")),
            r#"<div class="text-bg-primary p-3 mb-3 rounded w-75" data-message="0">hello</div>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_to_html(&card("<b>&</b>", "1"));
        assert!(html.contains(">&lt;b&gt;&amp;&lt;/b&gt;</div>"));
    }

    #[test]
    fn test_void_element() {
        let node = DomNode::element("input").with_attr("type", "text");
        let html = render_to_html(&node);
        assert_eq!(html, r#"<input type="text">"#);
    }

    #[test]
    fn test_page_embeds_config_and_scripts() {
        let mut opts = PageOptions::new(
            DomNode::element("body").with_child(DomNode::element("div").with_attr("id", "messages")),
        );
        opts.title = Some("Cards & more".into());
        opts.styles.push("https://cdn.example/bootstrap.min.css".into());
        opts.wasm_modules.push("./pkg/cardlist_web.js".into());
        opts.config_json = Some(r#"{"output_id":"</script>"}"#.into());

        let html = render_page(&opts);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Cards &amp; more</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="https://cdn.example/bootstrap.min.css" />"#));
        assert!(html.contains(r#"<script type="application/json" id="cardlist-config">{"output_id":"<\/script>"}</script>"#));
        assert!(html.contains(r#"<body><div id="messages"></div></body>"#));
        assert!(html.contains("<script type=\"module\">\nimport init from \"./pkg/cardlist_web.js\";\ninit();\n</script>"));
        assert!(html.ends_with("</html>"));
    }
}
