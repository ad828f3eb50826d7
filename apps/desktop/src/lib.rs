//! Desktop icon browser: the sprite's icons in a searchable grid, with the
//! component snippet for the selected one.

use arcade::domain::config::IconsConfig;
use arcade::icons::ui::{Icon, IconContext, IconProvider, SpriteSourceContext};
use arcade::icons::{IconRequest, Session, SpriteLoadError, source};
use dioxus::desktop::{Config, WindowBuilder};
use dioxus::prelude::*;

const PREVIEW_SIZE: u32 = 48;

#[derive(Debug)]
pub struct DesktopApp {
    title: String,
    width: f64,
    height: f64,
    icons: IconsConfig,
}

impl Default for DesktopApp {
    fn default() -> Self {
        Self {
            title: "Arcade Icons".to_owned(),
            width: 1200.0,
            height: 800.0,
            icons: IconsConfig::default(),
        }
    }
}

impl DesktopApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use = "This function does nothing unless you call `launch()` on it"]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Where the sprite comes from and how icons are sized.
    #[must_use = "This function does nothing unless you call `launch()` on it"]
    pub fn with_icons(mut self, icons: IconsConfig) -> Self {
        self.icons = icons;
        self
    }

    /// The entry point for launching the app
    ///
    /// # Errors
    /// Returns [`SpriteLoadError`] if the configured sprite source cannot be built.
    pub fn launch(self) -> Result<(), SpriteLoadError> {
        let sprite_source = SpriteSourceContext(source::from_config(&self.icons)?);
        let session = Session::new();
        let icons = self.icons;

        let window = WindowBuilder::new().with_title(&self.title).with_inner_size(
            dioxus::desktop::LogicalSize { width: self.width, height: self.height },
        );

        let cfg = Config::default().with_window(window).with_custom_head(
            r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#.into(),
        );

        LaunchBuilder::desktop()
            .with_cfg(cfg)
            .with_context_provider(move || Box::new(session.clone()))
            .with_context_provider(move || Box::new(sprite_source.clone()))
            .with_context_provider(move || Box::new(icons.clone()))
            .launch(app);
        Ok(())
    }
}

fn app() -> Element {
    rsx! {
        IconProvider { Browser {} }
    }
}

#[component]
fn Browser() -> Element {
    let icons = use_context::<IconContext>();
    let mut search = use_signal(String::new);
    let mut selected = use_signal(|| None::<String>);

    let loaded = icons.loaded();
    let total = icons.resolver().list_all().len();
    let names = icons.resolver().search(&search.read());
    let shown = names.len();

    rsx! {
        div { class: "icon-browser",
            header {
                Icon { name: "search", size: 20 }
                input {
                    placeholder: "Search icons",
                    value: "{search}",
                    oninput: move |event| search.set(event.value()),
                }
            }
            if !loaded {
                p { class: "loading", "Loading sprite..." }
            }
            ul { class: "icon-grid",
                for name in names {
                    li {
                        key: "{name}",
                        class: if selected.read().as_deref() == Some(name.as_str()) { "selected" },
                        onclick: {
                            let name = name.clone();
                            move |_| {
                                let next = (selected.read().as_deref() != Some(name.as_str())).then(|| name.clone());
                                selected.set(next);
                            }
                        },
                        Icon { name: name.clone(), size: PREVIEW_SIZE }
                        span { "{name}" }
                    }
                }
            }
            footer { "ICONS: {shown} / {total}" }
            if let Some(name) = selected() {
                aside { class: "icon-details",
                    Icon { name: name.clone(), size: 96, title: name.clone() }
                    pre { {IconRequest::new(name.as_str()).usage_snippet()} }
                    pre { {IconRequest::new(name.as_str()).size(PREVIEW_SIZE).usage_snippet()} }
                }
            }
        }
    }
}
