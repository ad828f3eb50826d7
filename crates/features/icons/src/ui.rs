//! Dioxus bindings: an `IconProvider` component that loads the sprite for
//! its subtree and an `Icon` component that renders through it.
//!
//! Hosts share one [`Session`] across providers by putting it in context
//! (e.g. `LaunchBuilder::with_context`); a provider without one starts its
//! own session. An [`IconsConfig`] in context seeds the sprite path and the
//! default icon size. The sprite source comes from [`SpriteSourceContext`]
//! and defaults to the configured asset directory.

use crate::provider::{IconProvider as Provider, LoadOutcome, ProviderConfig};
use crate::render::{Dimension, IconRenderer, IconRequest};
use crate::resolver::NameResolver;
use crate::session::Session;
use crate::source::{FileSpriteSource, SpriteSource};
use arcade_domain::config::IconsConfig;
use dioxus::prelude::*;
use std::rc::Rc;
use std::sync::Arc;

/// Context value overriding where providers fetch the sprite from.
#[derive(Debug, Clone)]
pub struct SpriteSourceContext(pub Arc<dyn SpriteSource>);

/// What an [`IconProvider`] shares with its subtree.
#[derive(Debug, Clone)]
pub struct IconContext {
    loaded: Signal<bool>,
    renderer: IconRenderer,
    resolver: NameResolver,
}

impl IconContext {
    /// Reactive readiness flag; reading it subscribes the caller.
    #[must_use]
    pub fn loaded(&self) -> bool {
        *self.loaded.read()
    }

    #[must_use]
    pub const fn renderer(&self) -> &IconRenderer {
        &self.renderer
    }

    #[must_use]
    pub const fn resolver(&self) -> &NameResolver {
        &self.resolver
    }
}

/// Loads the sprite once and provides [`IconContext`] to `children`.
///
/// `sprite_path` overrides the configured path. Every provider hosts the
/// hidden sprite container once the session has the sheet, so references
/// keep resolving after the provider that fetched it unmounts. The load is
/// scoped to the component: unmounting cancels it.
#[component]
pub fn IconProvider(#[props(into)] sprite_path: Option<String>, children: Element) -> Element {
    let session = use_hook(|| try_consume_context::<Session>().unwrap_or_default());
    let icons = use_hook(|| try_consume_context::<IconsConfig>().unwrap_or_default());
    let source = use_hook(|| {
        try_consume_context::<SpriteSourceContext>().map_or_else(
            || Arc::new(FileSpriteSource::new(icons.assets_dir.clone())) as Arc<dyn SpriteSource>,
            |context| context.0,
        )
    });
    let provider = use_hook(|| {
        let mut config = ProviderConfig::from(&icons);
        if let Some(path) = sprite_path.clone() {
            config.sprite_path = path;
        }
        Rc::new(Provider::new(session.clone(), config))
    });

    let mut loaded = use_signal(|| provider.readiness().is_loaded());

    use_hook(|| {
        let provider = Rc::clone(&provider);
        let source = Arc::clone(&source);
        spawn(async move {
            if !matches!(provider.load(source.as_ref()).await, LoadOutcome::Failed) {
                loaded.set(true);
            }
        })
    });

    use_context_provider(|| IconContext {
        loaded,
        renderer: provider.renderer(),
        resolver: provider.resolver(),
    });

    let container = loaded()
        .then(|| provider.session().sprite())
        .flatten()
        .map(|sprite| sprite.container_markup());

    rsx! {
        if let Some(markup) = container {
            div { dangerous_inner_html: "{markup}" }
        }
        {children}
    }
}

/// An icon referenced by sprite name. Outside a provider it stays a placeholder.
#[component]
pub fn Icon(
    #[props(into)] name: String,
    #[props(into)] size: Option<Dimension>,
    #[props(into)] width: Option<Dimension>,
    #[props(into)] height: Option<Dimension>,
    #[props(into)] title: Option<String>,
    #[props(into)] class: Option<String>,
) -> Element {
    let context = try_use_context::<IconContext>();
    let renderer = context.as_ref().map_or_else(IconRenderer::detached, |context| {
        // Subscribes this icon to the readiness flip.
        let _ = context.loaded();
        context.renderer.clone()
    });

    let mut request = IconRequest::new(name);
    if let Some(size) = size {
        request = request.size(size);
    }
    if let Some(width) = width {
        request = request.width(width);
    }
    if let Some(height) = height {
        request = request.height(height);
    }
    if let Some(title) = title {
        request = request.title(title);
    }
    if let Some(class) = class {
        request = request.class(class);
    }

    let markup = renderer.render(&request).to_markup();
    rsx! {
        span { class: "icon-slot", dangerous_inner_html: "{markup}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SpriteFuture;
    use arcade_domain::constants::SPRITE_CONTAINER_ID;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SHEET: &str = r#"<svg><symbol id="home" viewBox="0 0 24 24"/><symbol id="search" viewBox="0 0 24 24"/></svg>"#;

    #[derive(Debug, Default)]
    struct StaticSource(AtomicUsize);

    impl SpriteSource for StaticSource {
        fn fetch<'a>(&'a self, _path: &'a str) -> SpriteFuture<'a> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(SHEET.to_owned())
            })
        }
    }

    fn two_providers() -> Element {
        rsx! {
            IconProvider { Icon { name: "home" } }
            IconProvider { Icon { name: "search" } }
        }
    }

    fn one_provider() -> Element {
        rsx! {
            IconProvider { Icon { name: "home" } }
        }
    }

    fn dom(root: fn() -> Element, session: &Session, source: &Arc<StaticSource>) -> VirtualDom {
        VirtualDom::new(root)
            .with_root_context(session.clone())
            .with_root_context(SpriteSourceContext(Arc::clone(source) as Arc<dyn SpriteSource>))
    }

    /// Builds the tree and runs it until no task is left to make progress.
    async fn settle(dom: &mut VirtualDom) -> String {
        dom.rebuild_in_place();
        while tokio::time::timeout(Duration::from_millis(50), dom.wait_for_work()).await.is_ok() {
            let _mutations = dom.render_immediate_to_vec();
        }
        dioxus_ssr::render(dom)
    }

    #[tokio::test]
    async fn container_outlives_the_injecting_provider() {
        let session = Session::new();
        let source = Arc::new(StaticSource::default());

        let mut first = dom(two_providers, &session, &source);
        let html = settle(&mut first).await;
        assert_eq!(source.0.load(Ordering::SeqCst), 1);
        assert!(html.contains(SPRITE_CONTAINER_ID));
        assert!(html.contains(r##"<use href="#home"/>"##));
        assert!(html.contains(r##"<use href="#search"/>"##));
        drop(first);

        let mut second = dom(one_provider, &session, &source);
        let html = settle(&mut second).await;
        assert_eq!(source.0.load(Ordering::SeqCst), 1, "the session already has the sheet");
        assert!(html.contains(SPRITE_CONTAINER_ID));
        assert!(html.contains(r#"<symbol id="home""#));
        assert!(html.contains(r##"<use href="#home"/>"##));
    }

    #[tokio::test]
    async fn configured_size_applies_to_icons() {
        let session = Session::new();
        let source = Arc::new(StaticSource::default());
        let icons = IconsConfig { default_size: 32.0, ..IconsConfig::default() };

        let mut tree = dom(one_provider, &session, &source).with_root_context(icons);
        let html = settle(&mut tree).await;
        assert!(html.contains(r#"width="32" height="32""#));
    }

    #[tokio::test]
    async fn icons_outside_a_provider_are_placeholders() {
        let mut tree = VirtualDom::new(|| rsx! { Icon { name: "home" } });
        let html = settle(&mut tree).await;
        assert!(!html.contains("<use"));
        assert!(html.contains("<rect"));
    }
}
