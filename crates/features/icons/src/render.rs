//! Icon reference rendering: placeholder until the sprite is ready, then a
//! `<use>` reference to the named definition.

use crate::readiness::{Readiness, ReadinessHandle};
use crate::resolver::NameResolver;
use arcade_domain::constants::DEFAULT_ICON_SIZE;
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt;
use tracing::trace;

/// A width or height: plain user units (`24`) or any CSS length (`"1.5em"`).
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Units(f64),
    Css(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Units(units) => write!(f, "{units}"),
            Self::Css(css) => f.write_str(css),
        }
    }
}

impl From<f64> for Dimension {
    fn from(units: f64) -> Self {
        Self::Units(units)
    }
}

impl From<f32> for Dimension {
    fn from(units: f32) -> Self {
        Self::Units(f64::from(units))
    }
}

impl From<i32> for Dimension {
    fn from(units: i32) -> Self {
        Self::Units(f64::from(units))
    }
}

impl From<u32> for Dimension {
    fn from(units: u32) -> Self {
        Self::Units(f64::from(units))
    }
}

impl From<&str> for Dimension {
    fn from(css: &str) -> Self {
        Self::Css(css.to_owned())
    }
}

impl From<String> for Dimension {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

/// What the caller asks for: a name plus optional sizing, title, class and
/// passthrough attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconRequest {
    name: String,
    size: Option<Dimension>,
    width: Option<Dimension>,
    height: Option<Dimension>,
    title: Option<String>,
    class: Option<String>,
    attributes: Vec<(String, String)>,
}

impl IconRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uniform size; wins over [`IconRequest::width`] and [`IconRequest::height`].
    #[must_use]
    pub fn size(mut self, size: impl Into<Dimension>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn height(mut self, height: impl Into<Dimension>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// Accessible title. Icons without one are hidden from assistive technology.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Extra attribute copied onto the rendered element.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// The component invocation that reproduces this request, as offered by
    /// the icon browser's copy button.
    ///
    /// ```rust
    /// use arcade_icons::IconRequest;
    ///
    /// assert_eq!(IconRequest::new("home").usage_snippet(), r#"Icon { name: "home" }"#);
    /// assert_eq!(
    ///     IconRequest::new("home").size(64).usage_snippet(),
    ///     r#"Icon { name: "home", size: 64 }"#
    /// );
    /// ```
    #[must_use]
    pub fn usage_snippet(&self) -> String {
        let mut snippet = format!("Icon {{ name: {:?}", self.name);
        match &self.size {
            Some(Dimension::Units(units)) => snippet.push_str(&format!(", size: {units}")),
            Some(Dimension::Css(css)) => snippet.push_str(&format!(", size: {css:?}")),
            None => {},
        }
        if let Some(class) = self.class.as_deref().filter(|c| !c.trim().is_empty()) {
            snippet.push_str(&format!(", class: {class:?}"));
        }
        snippet.push_str(" }");
        snippet
    }
}

/// Turns requests into views according to the provider's readiness flag.
///
/// Holds no state of its own: the same request renders as a placeholder
/// before the flag flips and as a reference afterwards.
#[derive(Debug, Clone)]
pub struct IconRenderer {
    readiness: ReadinessHandle,
    resolver: NameResolver,
    default_size: f64,
}

impl IconRenderer {
    pub(crate) const fn new(readiness: ReadinessHandle, resolver: NameResolver, default_size: f64) -> Self {
        Self { readiness, resolver, default_size }
    }

    /// A renderer outside any provider. It renders placeholders only.
    #[must_use]
    pub fn detached() -> Self {
        let readiness = Readiness::new().handle();
        Self::new(readiness, NameResolver::detached(), DEFAULT_ICON_SIZE)
    }

    #[must_use]
    pub const fn readiness(&self) -> &ReadinessHandle {
        &self.readiness
    }

    pub fn render<'a>(&self, request: &'a IconRequest) -> IconView<'a> {
        let (width, height) = self.dimensions(request);
        if !self.readiness.is_loaded() {
            return IconView::Placeholder { request, width, height };
        }

        let present = self.resolver.exists(&request.name);
        if !present {
            trace!(name = %request.name, "Icon not found in sprite; rendering empty reference");
        }
        IconView::Reference { request, width, height, present }
    }

    fn dimensions(&self, request: &IconRequest) -> (Dimension, Dimension) {
        let fallback = || Dimension::Units(self.default_size);
        match &request.size {
            Some(size) => (size.clone(), size.clone()),
            None => (
                request.width.clone().unwrap_or_else(fallback),
                request.height.clone().unwrap_or_else(fallback),
            ),
        }
    }
}

/// The result of rendering one [`IconRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum IconView<'a> {
    /// Neutral box shown while the sprite is not ready.
    Placeholder { request: &'a IconRequest, width: Dimension, height: Dimension },
    /// Reference to the named definition. `present` is `false` when the
    /// sprite has no such name; the reference then draws nothing.
    Reference { request: &'a IconRequest, width: Dimension, height: Dimension, present: bool },
}

impl IconView<'_> {
    #[must_use]
    pub const fn request(&self) -> &IconRequest {
        match self {
            Self::Placeholder { request, .. } | Self::Reference { request, .. } => request,
        }
    }

    #[must_use]
    pub const fn width(&self) -> &Dimension {
        match self {
            Self::Placeholder { width, .. } | Self::Reference { width, .. } => width,
        }
    }

    #[must_use]
    pub const fn height(&self) -> &Dimension {
        match self {
            Self::Placeholder { height, .. } | Self::Reference { height, .. } => height,
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// `true` only for a reference to an existing definition.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Reference { present: true, .. })
    }

    /// The fragment link used by the `<use>` element, if this is a reference.
    #[must_use]
    pub fn href(&self) -> Option<String> {
        match self {
            Self::Placeholder { .. } => None,
            Self::Reference { request, .. } => Some(format!("#{}", request.name)),
        }
    }

    /// The element's class list, caller classes last.
    #[must_use]
    pub fn class_list(&self) -> String {
        let request = self.request();
        let base = match self {
            Self::Placeholder { .. } => Cow::Borrowed("icon-placeholder"),
            Self::Reference { .. } => Cow::Owned(format!("icon icon-{}", request.name)),
        };
        match request.class.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(extra) => format!("{base} {extra}"),
            None => base.into_owned(),
        }
    }

    /// Standalone SVG markup for this view.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let request = self.request();
        let mut attributes: Vec<(&str, Cow<'_, str>)> = vec![
            ("width", Cow::Owned(self.width().to_string())),
            ("height", Cow::Owned(self.height().to_string())),
            ("class", Cow::Owned(self.class_list())),
        ];
        match self {
            Self::Placeholder { .. } => attributes.push(("viewBox", Cow::Borrowed("0 0 24 24"))),
            Self::Reference { .. } => {
                let hidden = if request.title.is_some() { "false" } else { "true" };
                attributes.push(("aria-hidden", Cow::Borrowed(hidden)));
            },
        }
        for (name, value) in &request.attributes {
            if !is_attribute_name(name) || attributes.iter().any(|(taken, _)| taken == name) {
                trace!(attribute = %name, "Skipping passthrough attribute");
                continue;
            }
            attributes.push((name.as_str(), Cow::Borrowed(value.as_str())));
        }

        let mut markup = String::from("<svg");
        for (name, value) in &attributes {
            markup.push_str(&format!(r#" {name}="{}""#, escape(&**value)));
        }
        markup.push('>');

        match self {
            Self::Placeholder { .. } => {
                markup.push_str(r#"<rect width="24" height="24" fill="currentColor" opacity="0.2"/>"#);
            },
            Self::Reference { .. } => {
                if let Some(title) = &request.title {
                    markup.push_str(&format!("<title>{}</title>", escape(title.as_str())));
                }
                markup.push_str(&format!(r##"<use href="#{}"/>"##, escape(request.name.as_str())));
            },
        }
        markup.push_str("</svg>");
        markup
    }
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SpriteDocument;
    use crate::session::Session;

    fn renderer(loaded: bool) -> (Readiness, IconRenderer) {
        let session = Session::new();
        session.inject(SpriteDocument::parse(r#"<svg><symbol id="home"/></svg>"#).expect("sheet"));
        let readiness = Readiness::new();
        if loaded {
            readiness.writer().mark_loaded();
        }
        let renderer = IconRenderer::new(readiness.handle(), NameResolver::new(session), DEFAULT_ICON_SIZE);
        (readiness, renderer)
    }

    #[test]
    fn size_wins_over_width_and_height() {
        let (_owner, renderer) = renderer(true);
        let request = IconRequest::new("home").size(32).width(10).height(20);
        let view = renderer.render(&request);
        assert_eq!((view.width(), view.height()), (&Dimension::Units(32.0), &Dimension::Units(32.0)));
    }

    #[test]
    fn width_and_height_apply_individually() {
        let (_owner, renderer) = renderer(true);
        let request = IconRequest::new("home").width(10).height(20);
        let view = renderer.render(&request);
        assert_eq!(view.width().to_string(), "10");
        assert_eq!(view.height().to_string(), "20");

        let request = IconRequest::new("home").width("2em");
        let view = renderer.render(&request);
        assert_eq!(view.width().to_string(), "2em");
        assert_eq!(view.height().to_string(), "24");
    }

    #[test]
    fn default_size_is_24_units() {
        let (_owner, renderer) = renderer(false);
        let request = IconRequest::new("home");
        let view = renderer.render(&request);
        assert_eq!(view.width(), &Dimension::Units(24.0));
        assert_eq!(view.height(), &Dimension::Units(24.0));
    }

    #[test]
    fn placeholder_until_loaded() {
        let (owner, renderer) = renderer(false);
        let request = IconRequest::new("home").class("nav");
        assert!(renderer.render(&request).is_placeholder());
        assert_eq!(
            renderer.render(&request).to_markup(),
            r#"<svg width="24" height="24" class="icon-placeholder nav" viewBox="0 0 24 24"><rect width="24" height="24" fill="currentColor" opacity="0.2"/></svg>"#
        );

        owner.writer().mark_loaded();
        let view = renderer.render(&request);
        assert!(view.is_present());
        assert_eq!(view.href().as_deref(), Some("#home"));
    }

    #[test]
    fn missing_names_render_an_empty_reference() {
        let (_owner, renderer) = renderer(true);
        let request = IconRequest::new("missing");
        let view = renderer.render(&request);
        assert!(!view.is_placeholder());
        assert!(!view.is_present());
        assert_eq!(
            view.to_markup(),
            r##"<svg width="24" height="24" class="icon icon-missing" aria-hidden="true"><use href="#missing"/></svg>"##
        );
    }

    #[test]
    fn titles_and_attributes_are_escaped() {
        let (_owner, renderer) = renderer(true);
        let request = IconRequest::new("home")
            .title("Home & <away>")
            .attribute("data-tip", "say \"hi\"")
            .attribute("onclick=\"x\"", "ignored")
            .attribute("width", "999");
        let markup = renderer.render(&request).to_markup();

        assert!(markup.contains(r#"aria-hidden="false""#));
        assert!(markup.contains("<title>Home &amp; &lt;away&gt;</title>"));
        assert!(markup.contains(r#"data-tip="say &quot;hi&quot;""#));
        assert!(!markup.contains("onclick"));
        assert!(!markup.contains("999"));
    }

    #[test]
    fn detached_renderer_stays_in_placeholder() {
        let renderer = IconRenderer::detached();
        assert!(renderer.render(&IconRequest::new("home")).is_placeholder());
    }

    #[test]
    fn usage_snippets() {
        assert_eq!(IconRequest::new("home").usage_snippet(), r#"Icon { name: "home" }"#);
        assert_eq!(
            IconRequest::new("search").size(48).class("text-neon").usage_snippet(),
            r#"Icon { name: "search", size: 48, class: "text-neon" }"#
        );
        assert_eq!(IconRequest::new("x").size("2rem").usage_snippet(), r#"Icon { name: "x", size: "2rem" }"#);
    }
}
