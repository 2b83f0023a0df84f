// HTML Converter
// Converts between StructuredDocument and the HTML subset journal entries are stored in
// HTML is used purely as a storage/serialization format

use super::color::Color;
use super::structured_document::*;
use crate::config::EditorConfig;
use quick_xml::Reader;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// px values of the legacy `<font size="1..7">` steps
const FONT_TAG_SIZES: [u16; 7] = [10, 13, 16, 18, 24, 32, 48];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const INLINE_ELEMENTS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "strike", "del", "sup", "sub", "span", "font", "a",
];

const LINK_ATTRIBUTES: &str = r#"target="_blank" rel="noopener noreferrer""#;

/// Convert HTML markup to a StructuredDocument, using the default editor settings
pub fn html_to_document(markup: &str) -> StructuredDocument {
    html_to_document_with(markup, &EditorConfig::default())
}

/// Convert HTML markup to a StructuredDocument.
/// Never fails: markup the tokenizer rejects is reduced to its plain text.
pub fn html_to_document_with(markup: &str, config: &EditorConfig) -> StructuredDocument {
    let mut doc = match HtmlParser::new(markup, config).run() {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(error = %err, "markup is not well-formed, keeping its plain text");
            plain_text_document(markup)
        }
    };
    doc.normalize();
    doc
}

/// Convert a StructuredDocument to HTML markup.
/// Documents equal after normalization give byte-identical markup, so a
/// pinned caret placeholder never shows up as a run boundary.
pub fn document_to_html(doc: &StructuredDocument) -> String {
    let doc = doc.normalized();
    let mut output = String::new();
    if doc.is_blank() {
        return output;
    }

    let blocks = doc.blocks();
    let mut i = 0;
    while i < blocks.len() {
        let block_type = blocks[i].block_type;
        match block_type {
            BlockType::Paragraph => {
                write_block(&mut output, "p", &blocks[i]);
                i += 1;
            }
            BlockType::BlockQuote => {
                write_block(&mut output, "blockquote", &blocks[i]);
                i += 1;
            }
            BlockType::UnorderedList | BlockType::OrderedList => {
                let list_tag = if block_type == BlockType::UnorderedList {
                    "ul"
                } else {
                    "ol"
                };
                output.push_str(&format!("<{list_tag}>"));
                while i < blocks.len() && blocks[i].block_type == block_type {
                    write_block(&mut output, "li", &blocks[i]);
                    i += 1;
                }
                output.push_str(&format!("</{list_tag}>"));
            }
        }
    }
    output
}

fn write_block(output: &mut String, tag: &str, block: &Block) {
    output.push('<');
    output.push_str(tag);
    match block.alignment {
        Alignment::Left => {}
        Alignment::Center => output.push_str(r#" style="text-align: center""#),
        Alignment::Right => output.push_str(r#" style="text-align: right""#),
    }
    output.push('>');

    let runs = &block.runs;
    let mut i = 0;
    while i < runs.len() {
        let run = &runs[i];
        if let Some(raw) = &run.raw {
            output.push_str(raw);
            i += 1;
            continue;
        }
        let Some(url) = run.link_url() else {
            write_run(output, run);
            i += 1;
            continue;
        };

        // one <a> per group of runs sharing the url
        let mut end = i;
        while end < runs.len() && runs[end].link_url() == Some(url) {
            end += 1;
        }
        if runs[i..end].iter().any(|r| !r.is_empty()) {
            output.push_str(&format!(r#"<a href="{}" {}>"#, escape(url), LINK_ATTRIBUTES));
            for run in &runs[i..end] {
                write_run(output, run);
            }
            output.push_str("</a>");
        }
        i = end;
    }

    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

fn write_run(output: &mut String, run: &TextRun) {
    if run.is_empty() {
        return;
    }
    let style = &run.style;
    let mut closing: Vec<&str> = Vec::new();

    let mut declarations = Vec::new();
    if let Some(px) = style.font_size {
        declarations.push(format!("font-size: {px}px"));
    }
    if let Some(color) = style.text_color {
        declarations.push(format!("color: {color}"));
    }
    if let Some(color) = style.highlight {
        declarations.push(format!("background-color: {color}"));
    }
    if !declarations.is_empty() {
        output.push_str(&format!(r#"<span style="{}">"#, declarations.join("; ")));
        closing.push("</span>");
    }

    let tags = [
        (style.bold, "b"),
        (style.italic, "i"),
        (style.underline, "u"),
        (style.strikethrough, "s"),
        (style.superscript, "sup"),
        (style.subscript, "sub"),
    ];
    for (on, tag) in tags {
        if on {
            output.push_str(&format!("<{tag}>"));
            closing.push(match tag {
                "b" => "</b>",
                "i" => "</i>",
                "u" => "</u>",
                "s" => "</s>",
                "sup" => "</sup>",
                _ => "</sub>",
            });
        }
    }

    for (n, line) in run.text.split('\n').enumerate() {
        if n > 0 {
            output.push_str("<br>");
        }
        output.push_str(&partial_escape(line));
    }

    for tag in closing.iter().rev() {
        output.push_str(tag);
    }
}

/// Inline formatting element that is still open
struct InlineFrame {
    tag: String,
    style: TextStyle,
    link: Option<String>,
}

/// `blockquote`, `ul` or `ol` enclosing the blocks being read
struct Container {
    tag: String,
    block_type: BlockType,
    alignment: Option<Alignment>,
}

struct OpenBlock {
    block: Block,
    /// Opened by a block element rather than by loose inline content
    explicit: bool,
    /// Inline frames opened inside this block are closed with it
    frame_floor: usize,
}

impl OpenBlock {
    fn is_blank(&self) -> bool {
        self.block
            .runs
            .iter()
            .all(|r| !r.is_opaque() && r.text.trim().is_empty())
    }
}

struct HtmlParser<'a> {
    source: &'a str,
    config: &'a EditorConfig,
    blocks: Vec<Block>,
    current: Option<OpenBlock>,
    containers: Vec<Container>,
    frames: Vec<InlineFrame>,
}

impl<'a> HtmlParser<'a> {
    fn new(source: &'a str, config: &'a EditorConfig) -> Self {
        HtmlParser {
            source,
            config,
            blocks: Vec::new(),
            current: None,
            containers: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn run(mut self) -> Result<StructuredDocument, quick_xml::Error> {
        let source = self.source;
        let mut reader = Reader::from_str(source);
        reader.check_end_names(false);

        loop {
            let event_start = reader.buffer_position();
            match reader.read_event()? {
                Event::Start(e) => {
                    let tag = tag_name(&e);
                    if VOID_ELEMENTS.contains(&tag.as_str()) {
                        self.push_opaque(&source[event_start..reader.buffer_position()]);
                    } else if !self.open_element(&tag, &e) {
                        skip_element(&mut reader)?;
                        self.push_opaque(&source[event_start..reader.buffer_position()]);
                    }
                }
                Event::Empty(e) => {
                    let tag = tag_name(&e);
                    if is_block_element(&tag) {
                        self.open_block(&tag, &e);
                        self.close_element(&tag);
                    } else if tag == "br" {
                        self.push_text("\n");
                    } else if !INLINE_ELEMENTS.contains(&tag.as_str()) {
                        self.push_opaque(&source[event_start..reader.buffer_position()]);
                    }
                }
                Event::End(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                    self.close_element(&tag);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    let text = decode_entities(&text).replace(['\r', '\n'], " ");
                    self.push_text(&text);
                }
                Event::CData(e) => {
                    let text = reader.decoder().decode(&e)?;
                    self.push_text(&text);
                }
                Event::Eof => break,
                // comments, declarations, processing instructions
                _ => {}
            }
        }

        self.flush_block();
        Ok(StructuredDocument::from_blocks(self.blocks))
    }

    /// Handle a start tag. Returns false for elements the model does not know.
    fn open_element(&mut self, tag: &str, e: &BytesStart) -> bool {
        match tag {
            "p" | "div" | "li" | "blockquote" => self.open_block(tag, e),
            "ul" | "ol" => {
                self.containers.push(Container {
                    tag: tag.to_string(),
                    block_type: if tag == "ul" {
                        BlockType::UnorderedList
                    } else {
                        BlockType::OrderedList
                    },
                    alignment: alignment_of(e),
                });
            }
            "br" => self.push_text("\n"),
            _ if INLINE_ELEMENTS.contains(&tag) => self.push_frame(tag, e),
            _ => return false,
        }
        true
    }

    fn close_element(&mut self, tag: &str) {
        match tag {
            "p" | "div" | "li" => self.flush_block(),
            "blockquote" | "ul" | "ol" => {
                self.flush_block();
                if let Some(index) = self.containers.iter().rposition(|c| c.tag == tag) {
                    self.containers.truncate(index);
                }
            }
            _ => {
                if let Some(index) = self.frames.iter().rposition(|f| f.tag == tag) {
                    self.frames.truncate(index);
                }
            }
        }
    }

    fn open_block(&mut self, tag: &str, e: &BytesStart) {
        let own_alignment = alignment_of(e);
        if tag == "blockquote" {
            self.containers.push(Container {
                tag: tag.to_string(),
                block_type: BlockType::BlockQuote,
                alignment: own_alignment,
            });
        }

        // <li><p>..</p></li> and <blockquote><p>..</p></blockquote> are one block
        if let Some(open) = self.current.as_mut()
            && open.explicit
            && open.is_blank()
        {
            open.block.runs.clear();
            if let Some(alignment) = own_alignment {
                open.block.alignment = alignment;
            }
            return;
        }

        self.flush_block();
        let block_type = if tag == "li" {
            self.containers
                .iter()
                .rev()
                .map(|c| c.block_type)
                .find(BlockType::is_list)
                .unwrap_or(BlockType::UnorderedList)
        } else {
            self.container_block_type()
        };
        let alignment = own_alignment
            .or_else(|| self.containers.last().and_then(|c| c.alignment))
            .unwrap_or_default();
        self.current = Some(OpenBlock {
            block: Block::new(block_type).with_alignment(alignment),
            explicit: true,
            frame_floor: self.frames.len(),
        });
    }

    fn container_block_type(&self) -> BlockType {
        self.containers
            .last()
            .map(|c| c.block_type)
            .unwrap_or(BlockType::Paragraph)
    }

    fn flush_block(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };
        self.frames.truncate(open.frame_floor);
        if open.explicit || !open.is_blank() {
            self.blocks.push(open.block);
        }
    }

    /// Loose inline content gets an implicit paragraph
    fn current_block(&mut self) -> &mut Block {
        let block_type = self.container_block_type();
        let alignment = self
            .containers
            .last()
            .and_then(|c| c.alignment)
            .unwrap_or_default();
        let frame_floor = self.frames.len();
        let open = self.current.get_or_insert_with(|| OpenBlock {
            block: Block::new(block_type).with_alignment(alignment),
            explicit: false,
            frame_floor,
        });
        &mut open.block
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() || (self.current.is_none() && text.trim().is_empty()) {
            return;
        }
        let (style, link) = match self.frames.last() {
            Some(frame) => (frame.style, frame.link.clone()),
            None => (TextStyle::plain(), None),
        };
        let mut run = TextRun::new(text, style);
        if let Some(url) = link {
            run = run.with_link(Link::new(url));
        }
        self.current_block().runs.push(run);
    }

    fn push_opaque(&mut self, raw: &str) {
        self.current_block().runs.push(TextRun::opaque(raw));
    }

    fn push_frame(&mut self, tag: &str, e: &BytesStart) {
        let (mut style, mut link) = match self.frames.last() {
            Some(frame) => (frame.style, frame.link.clone()),
            None => (TextStyle::plain(), None),
        };

        match tag {
            "b" | "strong" => style.bold = true,
            "i" | "em" => style.italic = true,
            "u" => style.underline = true,
            "s" | "strike" | "del" => style.strikethrough = true,
            "sup" => style.set(StyleKind::Superscript, true),
            "sub" => style.set(StyleKind::Subscript, true),
            "font" => {
                if let Some(color) = attribute(e, "color").and_then(|c| Color::parse(&c)) {
                    style.text_color = Some(color);
                }
                if let Some(px) = attribute(e, "size")
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .and_then(|step| FONT_TAG_SIZES.get(step.checked_sub(1)?).copied())
                    .filter(|px| self.config.is_allowed_font_size(*px))
                {
                    style.font_size = Some(px);
                }
            }
            "a" => {
                if let Some(href) = attribute(e, "href") {
                    link = Some(href);
                }
            }
            _ => {}
        }
        if let Some(css) = attribute(e, "style") {
            self.apply_css(&mut style, &css);
        }

        self.frames.push(InlineFrame {
            tag: tag.to_string(),
            style,
            link,
        });
    }

    fn apply_css(&self, style: &mut TextStyle, css: &str) {
        for (property, value) in css_declarations(css) {
            match property.as_str() {
                "font-size" => {
                    if let Some(px) = parse_px(value).filter(|px| self.config.is_allowed_font_size(*px)) {
                        style.font_size = Some(px);
                    }
                }
                "color" => {
                    if let Some(color) = Color::parse(value) {
                        style.text_color = Some(color);
                    }
                }
                "background-color" | "background" => {
                    if let Some(color) = Color::parse(value) {
                        style.highlight = Some(color);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Consume events up to the end tag matching an already read start tag
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), quick_xml::Error> {
    let mut depth = 1usize;
    loop {
        match reader.read_event()? {
            Event::Start(e) if !VOID_ELEMENTS.contains(&tag_name(&e).as_str()) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn is_block_element(tag: &str) -> bool {
    matches!(tag, "p" | "div" | "li" | "blockquote")
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase()
}

fn attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.html_attributes()
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(name.as_bytes()))
        .map(|attr| decode_entities(&String::from_utf8_lossy(&attr.value)))
}

fn css_declarations(css: &str) -> impl Iterator<Item = (String, &str)> {
    css.split(';').filter_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        Some((property.trim().to_ascii_lowercase(), value.trim()))
    })
}

fn parse_px(value: &str) -> Option<u16> {
    let value = value.trim().to_ascii_lowercase();
    value.strip_suffix("px").unwrap_or(&value).trim().parse().ok()
}

fn parse_alignment(value: &str) -> Option<Alignment> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" => Some(Alignment::Right),
        _ => None,
    }
}

fn alignment_of(e: &BytesStart) -> Option<Alignment> {
    let from_css = attribute(e, "style").and_then(|css| {
        css_declarations(&css)
            .filter(|(property, _)| property == "text-align")
            .find_map(|(_, value)| parse_alignment(value))
    });
    from_css.or_else(|| attribute(e, "align").and_then(|a| parse_alignment(&a)))
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});")
            .expect("valid entity regex")
    })
}

fn complete_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^<>]*>").expect("valid tag regex"))
}

/// Decode character references. Unknown ones are kept as written.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    entity_re()
        .replace_all(text, |caps: &Captures| {
            resolve_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(c.to_string())
}

/// Best-effort recovery: drop complete tags, decode entities, keep the rest
/// (including a dangling `<...`) as one plain paragraph
fn plain_text_document(markup: &str) -> StructuredDocument {
    let stripped = complete_tag_re().replace_all(markup, "");
    let text = decode_entities(&stripped);
    if text.trim().is_empty() {
        StructuredDocument::with_paragraph("")
    } else {
        StructuredDocument::with_paragraph(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_document_paragraph() {
        let doc = html_to_document("<p>Hello world</p>");
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.blocks()[0].block_type, BlockType::Paragraph);
        assert_eq!(doc.blocks()[0].to_plain_text(), "Hello world");
    }

    #[test]
    fn test_inline_styles_nest() {
        let doc = html_to_document("<p>a<b>b<i>c</i></b><u>d</u><strike>e</strike></p>");
        let runs = &doc.blocks()[0].runs;
        assert_eq!(runs.len(), 5);
        assert!(runs[1].style.bold && !runs[1].style.italic);
        assert!(runs[2].style.bold && runs[2].style.italic);
        assert!(runs[3].style.underline);
        assert!(runs[4].style.strikethrough);
    }

    #[test]
    fn test_innermost_script_wins() {
        let doc = html_to_document("<p><sup><sub>x</sub></sup></p>");
        let style = doc.blocks()[0].runs[0].style;
        assert!(style.subscript);
        assert!(!style.superscript);
    }

    #[test]
    fn test_span_and_font_styles() {
        let doc = html_to_document(concat!(
            r#"<p><span style="font-size: 24px; color: rgb(255, 0, 0); background-color: #ff0">a</span>"#,
            r#"<font color="blue" size="7">b</font>"#,
            r#"<span style="font-size: 17px; color: bogus">c</span></p>"#,
        ));
        let runs = &doc.blocks()[0].runs;
        assert_eq!(runs[0].style.font_size, Some(24));
        assert_eq!(runs[0].style.text_color, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(runs[0].style.highlight, Some(Color::Rgb(255, 255, 0)));
        assert_eq!(runs[1].style.font_size, Some(48));
        assert_eq!(runs[1].style.text_color, Some(Color::Rgb(0, 0, 255)));
        assert!(runs[2].style.is_plain());
    }

    #[test]
    fn test_lists_quotes_and_alignment() {
        let doc = html_to_document(concat!(
            "<ul>\n  <li>one</li>\n  <li><p>two</p></li>\n</ul>",
            "<ol><li>three</li></ol>",
            r#"<blockquote><p style="text-align: center">quoted</p></blockquote>"#,
            r#"<div align="right">right</div>"#,
        ));
        let kinds: Vec<_> = doc.blocks().iter().map(|b| b.block_type).collect();
        assert_eq!(
            kinds,
            vec![
                BlockType::UnorderedList,
                BlockType::UnorderedList,
                BlockType::OrderedList,
                BlockType::BlockQuote,
                BlockType::Paragraph,
            ]
        );
        assert_eq!(doc.blocks()[1].to_plain_text(), "two");
        assert_eq!(doc.blocks()[3].alignment, Alignment::Center);
        assert_eq!(doc.blocks()[4].alignment, Alignment::Right);
    }

    #[test]
    fn test_loose_text_gets_a_paragraph() {
        let doc = html_to_document("hello <b>there</b><p>next</p>");
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.blocks()[0].to_plain_text(), "hello there");
    }

    #[test]
    fn test_links() {
        let doc = html_to_document(r#"<p><a href="https://x.org?a=1&amp;b=2">see <b>this</b></a></p>"#);
        let runs = &doc.blocks()[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].link_url(), Some("https://x.org?a=1&b=2"));
        assert_eq!(runs[1].link_url(), Some("https://x.org?a=1&b=2"));
        assert!(runs[1].style.bold);
    }

    #[test]
    fn test_entities_and_line_breaks() {
        let doc = html_to_document("<p>a &amp; b&nbsp;&lt;c&gt; &#233;&#x41;<br>next &bogus;</p>");
        assert_eq!(
            doc.blocks()[0].to_plain_text(),
            "a & b\u{a0}<c> éA\nnext &bogus;"
        );
    }

    #[test]
    fn test_unknown_elements_are_kept_verbatim() {
        let markup = r#"<p>a<img src="x.png">b<table><tr><td>c</td></tr></table></p>"#;
        let doc = html_to_document(markup);
        let runs = &doc.blocks()[0].runs;
        assert_eq!(runs[1].raw.as_deref(), Some(r#"<img src="x.png">"#));
        assert_eq!(runs[3].raw.as_deref(), Some("<table><tr><td>c</td></tr></table>"));
        assert_eq!(doc.blocks()[0].to_plain_text(), "ab");
        assert_eq!(document_to_html(&doc), markup);
    }

    #[test]
    fn test_malformed_markup_falls_back_to_text() {
        let doc = html_to_document("<b>kept</b> &amp; <not-well-formed");
        assert_eq!(doc.block_count(), 1);
        let block = &doc.blocks()[0];
        assert_eq!(block.runs, vec![TextRun::plain("kept & <not-well-formed")]);
    }

    #[test]
    fn test_empty_input() {
        for markup in ["", "   ", "\n"] {
            let doc = html_to_document(markup);
            assert!(doc.is_blank());
            assert_eq!(doc.block_count(), 1);
            assert_eq!(document_to_html(&doc), "");
        }
    }

    #[test]
    fn test_document_to_html() {
        let mut red = TextStyle::bold();
        red.text_color = Some(Color::Rgb(255, 0, 0));
        red.font_size = Some(18);
        let doc = StructuredDocument::from_blocks(vec![
            Block::paragraph()
                .with_alignment(Alignment::Center)
                .with_plain_text("a < b\nc")
                .with_text("red", red),
            Block::new(BlockType::UnorderedList).with_plain_text("x"),
            Block::new(BlockType::UnorderedList).with_plain_text("y"),
            Block::new(BlockType::OrderedList).with_plain_text("z"),
            Block::new(BlockType::BlockQuote)
                .with_run(TextRun::plain("q").with_link(Link::new("https://q.org"))),
        ]);
        assert_eq!(
            document_to_html(&doc),
            concat!(
                r#"<p style="text-align: center">a &lt; b<br>c<span style="font-size: 18px; color: #ff0000"><b>red</b></span></p>"#,
                "<ul><li>x</li><li>y</li></ul><ol><li>z</li></ol>",
                r#"<blockquote><a href="https://q.org" target="_blank" rel="noopener noreferrer">q</a></blockquote>"#,
            )
        );
    }

    #[test]
    fn test_round_trip() {
        let markup = concat!(
            r#"<p>plain <b><i>both</i></b> <a href="https://a.b" target="_blank" rel="noopener noreferrer">https://a.b</a></p>"#,
            r#"<ol><li><span style="background-color: transparent"><sup>2</sup></span></li></ol>"#,
            "<p></p>",
        );
        let doc = html_to_document(markup);
        assert_eq!(document_to_html(&doc), markup);
        assert_eq!(html_to_document(&document_to_html(&doc)), doc);
        let link = doc.blocks()[0].runs[3].link.as_ref().unwrap();
        assert!(link.auto_text);
    }

    #[test]
    fn test_placeholder_does_not_split_runs() {
        let doc = StructuredDocument::from_blocks(vec![
            Block::paragraph()
                .with_text("b", TextStyle::bold())
                .with_run(TextRun::placeholder(TextStyle::plain()))
                .with_text("old", TextStyle::bold()),
        ]);
        assert_eq!(document_to_html(&doc), "<p><b>bold</b></p>");
        assert_eq!(doc.blocks()[0].runs.len(), 3);
    }
}
