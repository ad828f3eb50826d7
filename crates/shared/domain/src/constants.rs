//! Names and defaults shared between the icon core and its hosts.

/// Where the sprite sheet is fetched from when nothing else is configured.
pub const DEFAULT_SPRITE_PATH: &str = "/sprite.svg";

/// Element id of the hidden container holding the injected sprite sheet.
///
/// Its presence on a page is the readiness marker for a prior injection.
pub const SPRITE_CONTAINER_ID: &str = "svg-sprite-container";

/// Edge length, in logical units, of an icon rendered without explicit dimensions.
pub const DEFAULT_ICON_SIZE: f64 = 24.0;

/// Element name of a graphic definition inside a sprite sheet.
pub const DEFINITION_ELEMENT: &str = "symbol";

/// Prefix for environment overrides (`ARCADE__ICONS__SPRITE_PATH`).
pub const ENV_PREFIX: &str = "ARCADE";
