use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::HtmlConfig;
use crate::render::Renderer;
use crate::text::{Segment, TextNode};

/// Renders the event stream to an HTML string.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    config: HtmlConfig,
    out: String,
}

impl HtmlRenderer {
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            out: String::new(),
        }
    }

    pub fn html(&self) -> &str {
        &self.out
    }

    pub fn into_html(self) -> String {
        self.out
    }

    fn text(&mut self, node: &TextNode) {
        for segment in node {
            self.segment(segment);
        }
    }

    fn segment(&mut self, segment: &Segment) {
        let style = segment.style;
        let target = segment.target.as_deref();
        let mut closers = Vec::new();

        if let (true, Some(href)) = (style.link, target) {
            self.out.push_str("<a href=\"");
            self.out.push_str(&encode_double_quoted_attribute(href));
            self.out.push_str("\">");
            closers.push("</a>");
        }
        for (on, open, close) in [
            (style.bold, "<strong>", "</strong>"),
            (style.italic, "<em>", "</em>"),
            (style.strikethrough, "<s>", "</s>"),
            (style.code, "<code>", "</code>"),
        ] {
            if on {
                self.out.push_str(open);
                closers.push(close);
            }
        }

        match (style.image, target) {
            (true, Some(src)) => {
                self.out.push_str("<img src=\"");
                self.out.push_str(&encode_double_quoted_attribute(src));
                self.out.push_str("\" alt=\"");
                let alt = segment.description.as_deref().unwrap_or(&segment.value);
                self.out.push_str(&encode_double_quoted_attribute(alt));
                self.out.push_str("\">");
            }
            _ => self.out.push_str(&encode_text(&segment.value)),
        }

        for close in closers.iter().rev() {
            self.out.push_str(close);
        }
    }

    fn list(&mut self, tag: &str, items: &[TextNode]) {
        self.out.push_str(&format!("<{tag}>\n"));
        for item in items {
            self.out.push_str("<li>");
            self.text(item);
            self.out.push_str("</li>\n");
        }
        self.out.push_str(&format!("</{tag}>\n"));
    }

    fn row(&mut self, cell_tag: &str, cells: &[TextNode]) {
        self.out.push_str("<tr>");
        for cell in cells {
            self.out.push_str(&format!("<{cell_tag}>"));
            self.text(cell);
            self.out.push_str(&format!("</{cell_tag}>"));
        }
        self.out.push_str("</tr>\n");
    }
}

impl Renderer for HtmlRenderer {
    fn body(&mut self) {
        self.out.clear();
        if self.config.standalone {
            self.out.push_str("<html><body>\n");
        }
    }

    fn done(&mut self) {
        if self.config.standalone {
            self.out.push_str("</body></html>\n");
        }
    }

    fn hr(&mut self) {
        self.out.push_str("<hr>\n");
    }

    fn heading(&mut self, level: u8, text: TextNode) {
        self.out.push_str(&format!("<h{level}>"));
        self.text(&text);
        self.out.push_str(&format!("</h{level}>\n"));
    }

    fn p(&mut self, text: TextNode) {
        self.out.push_str("<p>");
        self.text(&text);
        self.out.push_str("</p>\n");
    }

    fn append(&mut self, text: &str) {
        self.out.push_str("<p>");
        self.out.push_str(&encode_text(text));
        self.out.push_str("</p>\n");
    }

    fn ol(&mut self, items: Vec<TextNode>) {
        self.list("ol", &items);
    }

    fn ul(&mut self, items: Vec<TextNode>) {
        self.list("ul", &items);
    }

    fn table(&mut self, headings: Vec<TextNode>) {
        self.out.push_str("<table>\n");
        self.row("th", &headings);
    }

    fn tr(&mut self, cells: Vec<TextNode>) {
        self.row("td", &cells);
    }

    fn end_table(&mut self) {
        self.out.push_str("</table>\n");
    }

    fn start_blockquote(&mut self) {
        self.out.push_str("<blockquote class=\"");
        self.out
            .push_str(&encode_double_quoted_attribute(&self.config.quote_class));
        self.out.push_str("\">\n");
    }

    fn blockquote(&mut self, text: TextNode, level: usize) {
        self.out.push_str(&format!("<div style=\"--lvl:{level}\">"));
        self.text(&text);
        self.out.push_str("</div>\n");
    }

    fn end_blockquote(&mut self) {
        self.out.push_str("</blockquote>\n");
    }

    fn codeblock(&mut self, text: &str, language: Option<&str>) {
        match language {
            Some(lang) => {
                self.out.push_str("<pre><code class=\"language-");
                self.out.push_str(&encode_double_quoted_attribute(lang));
                self.out.push_str("\">");
            }
            None => self.out.push_str("<pre><code>"),
        }
        self.out.push_str(&encode_text(text));
        self.out.push_str("</code></pre>\n");
    }
}
