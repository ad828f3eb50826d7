//! # Icons
//!
//! Sprite-backed icons: one fetch of a sprite sheet per session, a shared
//! readiness flag per provider, name lookups and icon references that render
//! a placeholder until the sheet is ready.
//!
//! ```rust,no_run
//! use arcade_icons::{IconProvider, IconRequest, ProviderConfig, Session, source};
//! use arcade_domain::config::IconsConfig;
//!
//! # async fn run() -> Result<(), arcade_icons::SpriteLoadError> {
//! let config = IconsConfig::default();
//! let source = source::from_config(&config)?;
//! let provider = IconProvider::mount(Session::new(), source, ProviderConfig::from(&config));
//!
//! provider.readiness().subscribe().wait_ready().await;
//! let request = IconRequest::new("home").size(32);
//! println!("{}", provider.renderer().render(&request).to_markup());
//! # Ok(())
//! # }
//! ```
//!
//! The `client` feature adds Dioxus components in [`ui`].

mod document;
mod error;
mod provider;
mod readiness;
mod render;
mod resolver;
mod session;
pub mod source;
#[cfg(feature = "client")]
pub mod ui;

pub use crate::document::{GraphicDefinition, SpriteDocument};
pub use crate::error::{SpriteLoadError, SpriteLoadErrorExt};
pub use crate::provider::{IconProvider, LoadOutcome, ProviderConfig};
pub use crate::readiness::{ReadinessHandle, ReadinessObserver, ReadinessReceiver, ReadinessState};
pub use crate::render::{Dimension, IconRenderer, IconRequest, IconView};
pub use crate::resolver::{NameResolver, format_icon_name};
pub use crate::session::Session;
pub use crate::source::{FileSpriteSource, HttpSpriteSource, SpriteFuture, SpriteSource};
