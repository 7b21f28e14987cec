use std::fs;

use mdconv::{
    Block, Config, Error, HtmlConfig, List, MarkdownParser, Quote, Renderer, Segment, Style,
    TextNode, markdown_to_html, markdown_to_html_with_config, markdown_to_pdf_with_root,
    markdown_to_typst, parse, parse_inline,
};
use pretty_assertions::assert_eq;

fn values(node: &TextNode) -> Vec<&str> {
    node.iter().map(|s| s.value.as_str()).collect()
}

fn plain(text: &str) -> TextNode {
    let mut node = TextNode::default();
    node.push(Segment::new(text, Style::default()));
    node
}

#[test]
fn heading_paragraph_and_unspaced_hash() {
    let blocks = parse("### asdsad\nawds*asd&*##ads\n\n#Heading1");
    assert_eq!(blocks.len(), 3);

    assert_eq!(
        blocks[0],
        Block::Heading {
            level: 3,
            content: plain("asdsad")
        }
    );

    let Block::Paragraph { content } = &blocks[1] else {
        panic!("expected paragraph, got {:?}", blocks[1]);
    };
    assert_eq!(values(content), vec!["awds", "asd&", "##ads"]);
    assert!(content.segments[1].style.italic);

    assert_eq!(
        blocks[2],
        Block::Paragraph {
            content: plain("#Heading1")
        }
    );
}

#[test]
fn table_then_paragraph() {
    let blocks = parse(
        "|a|**b**|cd|\n|-|-|-|-|-\n|~~1~~|2|f|e|ads\n|3|4|f|asd\n|a|b|f|asd\n*asd*",
    );
    assert_eq!(blocks.len(), 2);

    let Block::Table { headers, rows } = &blocks[0] else {
        panic!("expected table, got {:?}", blocks[0]);
    };
    assert_eq!(headers.len(), 3);
    assert_eq!(headers[1].segments[0].value, "b");
    assert!(headers[1].segments[0].style.bold);

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == 3));
    assert_eq!(rows[0][0].segments[0].value, "1");
    assert!(rows[0][0].segments[0].style.strikethrough);
    assert_eq!(values(&rows[1][1]), vec!["4"]);

    let Block::Paragraph { content } = &blocks[1] else {
        panic!("expected paragraph, got {:?}", blocks[1]);
    };
    assert!(content.segments[0].style.italic);
}

#[test]
fn quotes_and_code() {
    let blocks = parse(">asd\n>asd\n>>asd\n\n```js\nlet a = '';\n```");
    assert_eq!(
        blocks,
        vec![
            Block::BlockQuote(vec![
                Quote {
                    level: 1,
                    content: plain("asd asd")
                },
                Quote {
                    level: 2,
                    content: plain("asd")
                },
            ]),
            Block::CodeBlock {
                language: Some("js".to_string()),
                content: "let a = '';".to_string()
            },
        ]
    );
}

#[test]
fn list_items_fold_continuation_lines() {
    let blocks = parse("1. ad*sa*s\nas*ds*ad\n2. bd*sa*d\nnew line");
    let [Block::List(List { ordered, items })] = blocks.as_slice() else {
        panic!("expected one list, got {:?}", blocks);
    };
    assert!(ordered);
    assert_eq!(values(&items[0]), vec!["ad", "sa", "s as", "ds", "ad"]);
    assert!(items[0].segments[3].style.italic);
    assert_eq!(values(&items[1]), vec!["bd", "sa", "d new line"]);
}

#[test]
fn inline_context_is_independent() {
    let node = parse_inline("a **b** c");
    assert_eq!(values(&node), vec!["a ", "b", " c"]);
    assert!(node.segments[1].style.bold);
}

#[test]
fn html_document() {
    let html = markdown_to_html("# T\n\n- x\n\n---\nend");
    assert_eq!(
        html,
        "<html><body>\n<h1>T</h1>\n<ul>\n<li>x</li>\n</ul>\n<hr>\n<p>end</p>\n</body></html>\n"
    );
}

#[test]
fn html_quote_class_from_config() {
    let config = Config::from_toml("[html]\nstandalone = false\nquote_class = \"q\"\n").unwrap();
    assert_eq!(
        config.html,
        HtmlConfig {
            standalone: false,
            quote_class: "q".to_string()
        }
    );
    assert_eq!(
        markdown_to_html_with_config("> hi", &config),
        "<blockquote class=\"q\">\n<div style=\"--lvl:1\">hi</div>\n</blockquote>\n"
    );
}

#[test]
fn typst_output_keeps_heading_with_body() {
    let typst = markdown_to_typst("## Intro\nBody **text**");
    assert!(typst.contains("#block(breakable: false)[\n== Intro\n\nBody #strong[text]\n\n]\n\n"));
}

#[test]
fn pdf_embeds_local_images_from_root() {
    let root = std::env::temp_dir().join(format!("mdconv-images-{}", std::process::id()));
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("dot.svg"),
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4"/></svg>"#,
    )
    .unwrap();

    let pdf = markdown_to_pdf_with_root("A dot: ![dot](dot.svg)", &Config::default(), &root).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let missing = markdown_to_pdf_with_root("![gone](gone.png)", &Config::default(), &root);
    assert!(matches!(missing, Err(Error::Compile(_))));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unclosed_link_renders_literally() {
    let html = markdown_to_html_with_config(
        "a [b c",
        &Config {
            html: HtmlConfig {
                standalone: false,
                ..HtmlConfig::default()
            },
            ..Config::default()
        },
    );
    assert_eq!(html, "<p>a [b c</p>\n");
}

/// Counts events to check the render grammar is respected.
#[derive(Default)]
struct Counter {
    opened: usize,
    closed: usize,
    rows: usize,
    tables: usize,
    ended_tables: usize,
}

impl Renderer for Counter {
    fn body(&mut self) {
        self.opened += 1;
    }
    fn done(&mut self) {
        self.closed += 1;
    }
    fn hr(&mut self) {}
    fn heading(&mut self, _level: u8, _text: TextNode) {}
    fn p(&mut self, _text: TextNode) {}
    fn append(&mut self, _text: &str) {}
    fn ol(&mut self, _items: Vec<TextNode>) {}
    fn ul(&mut self, _items: Vec<TextNode>) {}
    fn table(&mut self, _headings: Vec<TextNode>) {
        self.tables += 1;
    }
    fn tr(&mut self, _cells: Vec<TextNode>) {
        self.rows += 1;
    }
    fn end_table(&mut self) {
        self.ended_tables += 1;
    }
    fn start_blockquote(&mut self) {}
    fn blockquote(&mut self, _text: TextNode, _level: usize) {}
    fn end_blockquote(&mut self) {}
    fn codeblock(&mut self, _text: &str, _language: Option<&str>) {}
}

#[test]
fn custom_renderer_sees_every_table_event() {
    let mut counter = Counter::default();
    let mut parser = MarkdownParser::new(&mut counter);
    parser.parse("|a|b|\n|-|-|\n|1|2|\n|3|4|\n\n|c|d|\n|-|-|");
    assert_eq!(counter.opened, 1);
    assert_eq!(counter.closed, 1);
    assert_eq!(counter.tables, 2);
    assert_eq!(counter.ended_tables, 2);
    assert_eq!(counter.rows, 2);
}
