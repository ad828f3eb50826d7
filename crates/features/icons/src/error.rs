use std::borrow::Cow;

/// Failure to fetch or parse the sprite sheet.
///
/// Reported once through `tracing` and recorded on the readiness registry;
/// icons stay in their placeholder state for the rest of the session.
#[arcade_derive::arcade_error]
pub enum SpriteLoadError {
    /// The sprite endpoint answered with a non-success status.
    #[error("Failed to load SVG sprite ({status} {reason}){}", format_context(.context))]
    Status { status: u16, reason: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Sprite transport failure{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Sprite read failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The body is not well-formed markup.
    #[error("Malformed sprite sheet{}: {source}", format_context(.context))]
    Parse { source: quick_xml::Error, context: Option<Cow<'static, str>> },

    /// The sprite path cannot be resolved against its origin or asset root.
    #[error("Invalid sprite path{}: {message}", format_context(.context))]
    InvalidPath { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal sprite error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl SpriteLoadError {
    /// HTTP-like status carried by [`SpriteLoadError::Status`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
