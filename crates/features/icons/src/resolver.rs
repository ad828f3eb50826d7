//! Name lookups against the injected sprite.

use crate::session::Session;

/// Answers "is this icon available" and "which icons are available".
///
/// Every query reads one snapshot of the session's injected document, so a
/// load completing mid-call is either fully visible or not at all. A detached
/// resolver has no document context and answers `false` / empty.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    session: Option<Session>,
}

impl NameResolver {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session: Some(session) }
    }

    /// A resolver for contexts without a live document, e.g. a server-side render pass.
    #[must_use]
    pub const fn detached() -> Self {
        Self { session: None }
    }

    /// Whether a definition with exactly this name is present.
    ///
    /// `false` until the sprite has been injected.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.session
            .as_ref()
            .and_then(Session::sprite)
            .is_some_and(|sprite| sprite.contains(name))
    }

    /// Every definition name, in document order.
    #[must_use]
    pub fn list_all(&self) -> Vec<String> {
        self.session
            .as_ref()
            .and_then(Session::sprite)
            .map(|sprite| sprite.names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Names containing `term`, ignoring case. The term is matched as given,
    /// whitespace included; an empty term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<String> {
        let term = term.to_lowercase();
        let mut names = self.list_all();
        names.retain(|name| name.to_lowercase().contains(&term));
        names
    }
}

/// Normalizes an identifier to the kebab-case used for sprite names.
///
/// A hyphen goes between a lowercase letter or digit and a following
/// uppercase letter, whitespace runs collapse to one hyphen, and the
/// result is lowercased.
///
/// ```rust
/// use arcade_icons::format_icon_name;
///
/// assert_eq!(format_icon_name("arrowLeft"), "arrow-left");
/// assert_eq!(format_icon_name("My Icon"), "my-icon");
/// ```
#[must_use]
pub fn format_icon_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    let mut in_space = false;

    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            prev = Some(ch);
            continue;
        }
        in_space = false;

        if ch.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('-');
        }
        out.push(ch);
        prev = Some(ch);
    }

    out.to_lowercase()
}
