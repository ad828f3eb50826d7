//! The fetched sprite sheet and the graphic definitions it carries.

use crate::error::{SpriteLoadError, SpriteLoadErrorExt};
use arcade_domain::constants::{DEFINITION_ELEMENT, SPRITE_CONTAINER_ID};
use fxhash::FxHashMap;
use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;
use tracing::warn;

/// One named vector shape inside a [`SpriteDocument`].
///
/// Holds the name and the byte span of its element in the document markup;
/// the shape itself is never copied out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicDefinition {
    name: Box<str>,
    span: Range<usize>,
}

impl GraphicDefinition {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte range of the definition element within [`SpriteDocument::markup`].
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// An immutable, parsed sprite sheet.
///
/// Definitions are kept in document order. When two definitions share a
/// name the first one wins and the later one is dropped with a warning.
#[derive(Debug)]
pub struct SpriteDocument {
    markup: String,
    definitions: Vec<GraphicDefinition>,
    index: FxHashMap<Box<str>, usize>,
}

impl SpriteDocument {
    /// Parses sprite markup and indexes every `<symbol id="..">` it contains.
    ///
    /// # Errors
    /// Returns [`SpriteLoadError::Parse`] when the markup is not well-formed.
    ///
    /// # Example
    /// ```rust
    /// use arcade_icons::SpriteDocument;
    ///
    /// let sheet = SpriteDocument::parse(
    ///     r#"<svg><symbol id="home"/><symbol id="search"></symbol></svg>"#,
    /// ).unwrap();
    /// assert_eq!(sheet.names().collect::<Vec<_>>(), ["home", "search"]);
    /// ```
    pub fn parse(markup: impl Into<String>) -> Result<Self, SpriteLoadError> {
        let markup = markup.into();
        let mut definitions: Vec<GraphicDefinition> = Vec::new();
        let mut index = FxHashMap::default();
        // Every open element, and per open `<symbol>` its slot in `definitions` (if named).
        let mut elements: Vec<Box<str>> = Vec::new();
        let mut open: Vec<Option<usize>> = Vec::new();

        let mut reader = Reader::from_str(&markup);
        loop {
            let event = reader.read_event().context("Parsing sprite sheet")?;
            let end = offset(&reader, markup.len());
            match event {
                Event::Start(tag) => {
                    elements.push(String::from_utf8_lossy(tag.name().as_ref()).into());
                    if is_definition(&tag) {
                        let slot = definition_name(&tag)?.and_then(|name| {
                            let begin = tag_start(&markup, end);
                            register(&mut definitions, &mut index, name, begin..end)
                        });
                        open.push(slot);
                    }
                },
                Event::Empty(tag) if is_definition(&tag) => {
                    if let Some(name) = definition_name(&tag)? {
                        let begin = tag_start(&markup, end);
                        register(&mut definitions, &mut index, name, begin..end);
                    }
                },
                Event::End(tag) => {
                    elements.pop();
                    if tag.name().as_ref() == DEFINITION_ELEMENT.as_bytes() {
                        if let Some(Some(slot)) = open.pop() {
                            definitions[slot].span.end = end;
                        }
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if let Some(unclosed) = elements.pop() {
            return Err(SpriteLoadError::Parse {
                source: IllFormedError::MissingEndTag(unclosed.into()).into(),
                context: Some("Sprite sheet ends inside an element".into()),
            });
        }

        Ok(Self { markup, definitions, index })
    }

    /// Raw markup exactly as fetched.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// All definitions in document order.
    #[must_use]
    pub fn definitions(&self) -> &[GraphicDefinition] {
        &self.definitions
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(GraphicDefinition::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GraphicDefinition> {
        self.index.get(name).map(|&slot| &self.definitions[slot])
    }

    /// The markup of a single definition, e.g. for inlining without a page-level sprite.
    #[must_use]
    pub fn markup_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|definition| self.markup.get(definition.span()))
    }

    /// Hidden container that hosts the sprite on a page.
    ///
    /// Its id doubles as the page-level marker of a completed injection.
    #[must_use]
    pub fn container_markup(&self) -> String {
        format!(r#"<div id="{SPRITE_CONTAINER_ID}" style="display: none">{}</div>"#, self.markup)
    }
}

fn register(
    definitions: &mut Vec<GraphicDefinition>,
    index: &mut FxHashMap<Box<str>, usize>,
    name: Box<str>,
    span: Range<usize>,
) -> Option<usize> {
    if index.contains_key(&name) {
        warn!(name = %name, "Duplicate sprite definition ignored; first definition wins");
        return None;
    }
    let slot = definitions.len();
    index.insert(name.clone(), slot);
    definitions.push(GraphicDefinition { name, span });
    Some(slot)
}

fn is_definition(tag: &BytesStart<'_>) -> bool {
    tag.name().as_ref() == DEFINITION_ELEMENT.as_bytes()
}

fn definition_name(tag: &BytesStart<'_>) -> Result<Option<Box<str>>, SpriteLoadError> {
    let Some(attr) = tag.try_get_attribute("id").map_err(quick_xml::Error::from)? else {
        return Ok(None);
    };
    // Ids are matched verbatim; `<use href="#x">` does not trim either.
    let value = attr.unescape_value().context("Reading definition id")?;
    Ok((!value.is_empty()).then(|| value.as_ref().into()))
}

fn offset(reader: &Reader<&[u8]>, len: usize) -> usize {
    usize::try_from(reader.buffer_position()).map_or(len, |pos| pos.min(len))
}

/// Start of the tag that ends right before `end`. `<` cannot occur inside a
/// well-formed tag, so the nearest one to the left opens it.
fn tag_start(markup: &str, end: usize) -> usize {
    markup[..end].rfind('<').unwrap_or_default()
}
