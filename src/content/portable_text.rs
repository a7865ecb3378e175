//! Portable Text (the CMS rich-text format) rendering with syntax highlighting

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::post::null_as_default;
use super::ImageField;
use crate::cms::ImageUrlBuilder;
use crate::helpers::escape_html;

/// A rich-text body: an array of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortableText(pub Vec<Block>);

impl PortableText {
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for PortableText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
        Ok(PortableText(
            raw.unwrap_or_default()
                .into_iter()
                .map(Block::from_value)
                .collect(),
        ))
    }
}

/// One top-level body block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum Block {
    Block(TextBlock),
    Image(ImageField),
    Code(CodeBlock),
    #[serde(other)]
    Unknown,
}

impl Block {
    /// Decode a block; anything malformed becomes `Unknown`
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value) {
            Ok(block) => block,
            Err(e) => {
                tracing::debug!("Skipping malformed body block: {}", e);
                Block::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

/// Annotation referenced from span marks by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    fn from_item(item: &str) -> Self {
        match item {
            "number" => ListKind::Number,
            _ => ListKind::Bullet,
        }
    }

    fn open(self) -> &'static str {
        match self {
            ListKind::Bullet => "<ul>",
            ListKind::Number => "<ol>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            ListKind::Bullet => "</ul>",
            ListKind::Number => "</ol>",
        }
    }
}

/// Portable Text to HTML renderer
pub struct PortableTextRenderer {
    images: ImageUrlBuilder,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl PortableTextRenderer {
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self {
            images,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
        }
    }

    /// Render a body to HTML
    pub fn render(&self, body: &PortableText) -> String {
        let mut html = String::new();
        let mut lists: Vec<(ListKind, usize)> = Vec::new();

        for block in body.blocks() {
            if let Block::Block(text) = block {
                if let Some(item) = text.list_item.as_deref() {
                    let kind = ListKind::from_item(item);
                    let level = text.level.unwrap_or(1).max(1);

                    while let Some(&(open_kind, open_level)) = lists.last() {
                        if open_level > level || (open_level == level && open_kind != kind) {
                            html.push_str("</li>");
                            html.push_str(open_kind.close());
                            lists.pop();
                        } else {
                            break;
                        }
                    }

                    match lists.last() {
                        Some(&(_, open_level)) if open_level == level => html.push_str("</li>"),
                        _ => {
                            html.push_str(kind.open());
                            lists.push((kind, level));
                        }
                    }

                    html.push_str("<li>");
                    html.push_str(&self.render_spans(text));
                    continue;
                }
            }

            close_lists(&mut html, &mut lists);

            match block {
                Block::Block(text) => html.push_str(&self.render_text_block(text)),
                Block::Image(image) => html.push_str(&self.render_image(image)),
                Block::Code(code) => html.push_str(&self.render_code(code)),
                Block::Unknown => {}
            }
        }

        close_lists(&mut html, &mut lists);
        html
    }

    fn render_text_block(&self, block: &TextBlock) -> String {
        let tag = match block.style.as_deref().unwrap_or("normal") {
            style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote") => style,
            _ => "p",
        };
        format!("<{tag}>{}</{tag}>", self.render_spans(block))
    }

    fn render_spans(&self, block: &TextBlock) -> String {
        let mut html = String::new();
        for span in &block.children {
            let mut inner = escape_html(&span.text).replace('\n', "<br/>");
            for mark in &span.marks {
                inner = apply_mark(&inner, mark, &block.mark_defs);
            }
            html.push_str(&inner);
        }
        html
    }

    fn render_image(&self, image: &ImageField) -> String {
        match image.resolve(&self.images) {
            Some(src) => format!(
                r#"<figure><img src="{}" alt="{}" loading="lazy"/></figure>"#,
                escape_html(&src),
                escape_html(image.alt.as_deref().unwrap_or(""))
            ),
            None => String::new(),
        }
    }

    fn render_code(&self, code: &CodeBlock) -> String {
        let lang = code.language.as_deref().unwrap_or("text");
        let caption = code
            .filename
            .as_deref()
            .map(|f| format!("<figcaption>{}</figcaption>", escape_html(f)))
            .unwrap_or_default();
        format!(
            r#"<figure class="highlight {}">{}{}</figure>"#,
            escape_html(lang),
            caption,
            self.highlight_code(&code.code, lang)
        )
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            });

        match highlighted {
            Some(html) => html,
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            ),
        }
    }
}

fn close_lists(html: &mut String, lists: &mut Vec<(ListKind, usize)>) {
    while let Some((kind, _)) = lists.pop() {
        html.push_str("</li>");
        html.push_str(kind.close());
    }
}

fn apply_mark(inner: &str, mark: &str, defs: &[MarkDef]) -> String {
    match mark {
        "strong" => format!("<strong>{}</strong>", inner),
        "em" => format!("<em>{}</em>", inner),
        "code" => format!("<code>{}</code>", inner),
        "underline" => format!(r#"<span style="text-decoration:underline">{}</span>"#, inner),
        "strike-through" => format!("<del>{}</del>", inner),
        key => match defs.iter().find(|d| d.key == key) {
            Some(def) if def.kind == "link" => match def.href.as_deref().filter(|h| is_safe_href(h)) {
                Some(href) if href.starts_with("http://") || href.starts_with("https://") => format!(
                    r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                    escape_html(href),
                    inner
                ),
                Some(href) => format!(r#"<a href="{}">{}</a>"#, escape_html(href), inner),
                None => inner.to_string(),
            },
            _ => inner.to_string(),
        },
    }
}

fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    ["http://", "https://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|prefix| href.starts_with(prefix))
}

/// The first child text of every block, as the minimal blog view shows it
pub fn plain_paragraphs(body: &PortableText) -> Vec<String> {
    body.blocks()
        .iter()
        .map(|block| match block {
            Block::Block(text) => text
                .children
                .first()
                .map(|span| span.text.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .collect()
}

/// All span text joined into one string
pub fn to_plain_text(body: &PortableText) -> String {
    body.blocks()
        .iter()
        .filter_map(|block| match block {
            Block::Block(text) => Some(
                text.children
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
