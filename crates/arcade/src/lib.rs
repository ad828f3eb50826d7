//! Facade crate for Arcade features and shared modules.
//! Re-exports domain/kernel primitives and the icon slice.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `arcade` with the desired feature flags (`client` for the Dioxus components).
//! - Call [`icons::mount`] to start a provider straight from the app config.

pub use arcade_domain as domain;
pub use arcade_kernel as kernel;

/// Sprite-backed icons.
pub mod icons {
    pub use arcade_icons::*;

    use arcade_domain::config::IconsConfig;

    /// Mounts a provider for `session` using the source and options in `config`.
    ///
    /// # Errors
    /// Returns a [`SpriteLoadError`] if the configured source cannot be built.
    pub fn mount(session: Session, config: &IconsConfig) -> Result<IconProvider, SpriteLoadError> {
        let source = source::from_config(config)?;
        Ok(IconProvider::mount(session, source, ProviderConfig::from(config)))
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "icons",
        #[cfg(feature = "client")]
        "client",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
