//! Content module - CMS document models, body rendering and listing layout

pub mod grouping;
mod portable_text;
mod post;

pub use grouping::{category_slug, CategorySection, HomeLayout, HoverPreview};
pub use portable_text::{
    plain_paragraphs, to_plain_text, Block, CodeBlock, MarkDef, PortableText,
    PortableTextRenderer, Span, TextBlock,
};
pub use post::{
    image_or, parse_datetime, Asset, Author, Category, CategoryRef, ImageField, Post,
    PostSummary, RelatedPost, Slug,
};
