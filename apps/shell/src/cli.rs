use arcade::domain::config::AppConfig;
use arcade::icons::{Dimension, IconRequest};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and render icons from an SVG sprite sheet.
#[derive(Debug, Parser)]
#[command(name = "arcade", version, about)]
pub(crate) struct Cli {
    /// Config file (`arcade.toml` in the working directory when omitted).
    #[arg(long, short, global = true)]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) sprite: SpriteArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Overrides for the `[icons]` config section.
#[derive(Debug, Args)]
pub(crate) struct SpriteArgs {
    /// Sprite path, relative to the origin or asset directory.
    #[arg(long, global = true)]
    pub(crate) sprite_path: Option<String>,

    /// HTTP origin to fetch the sprite from.
    #[arg(long, global = true, conflicts_with = "assets_dir")]
    pub(crate) origin: Option<String>,

    /// Local asset directory to read the sprite from.
    #[arg(long, global = true)]
    pub(crate) assets_dir: Option<PathBuf>,
}

impl SpriteArgs {
    pub(crate) fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.sprite_path {
            config.icons.sprite_path.clone_from(path);
        }
        if let Some(origin) = &self.origin {
            config.icons.origin = Some(origin.clone());
        }
        if let Some(dir) = &self.assets_dir {
            config.icons.origin = None;
            config.icons.assets_dir.clone_from(dir);
        }
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List icon names in sprite order.
    List {
        /// Only names containing this text (case-insensitive).
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Exit with failure unless the icon exists.
    Check { name: String },
    /// Print the SVG markup for an icon.
    Render(RenderArgs),
    /// Normalize a name to sprite kebab-case. Does not load the sprite.
    Format { text: Vec<String> },
}

#[derive(Debug, Args)]
pub(crate) struct RenderArgs {
    pub(crate) name: String,
    /// Uniform size; wins over width and height.
    #[arg(long)]
    pub(crate) size: Option<String>,
    #[arg(long)]
    pub(crate) width: Option<String>,
    #[arg(long)]
    pub(crate) height: Option<String>,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) class: Option<String>,
    /// Also print the component snippet for this icon.
    #[arg(long)]
    pub(crate) snippet: bool,
}

impl RenderArgs {
    pub(crate) fn request(&self) -> IconRequest {
        let mut request = IconRequest::new(self.name.as_str());
        if let Some(size) = &self.size {
            request = request.size(dimension(size));
        }
        if let Some(width) = &self.width {
            request = request.width(dimension(width));
        }
        if let Some(height) = &self.height {
            request = request.height(dimension(height));
        }
        if let Some(title) = &self.title {
            request = request.title(title.as_str());
        }
        if let Some(class) = &self.class {
            request = request.class(class.as_str());
        }
        request
    }
}

/// Bare numbers are user units; anything else is passed through as CSS.
fn dimension(raw: &str) -> Dimension {
    raw.trim().parse::<f64>().map_or_else(|_| Dimension::Css(raw.trim().to_owned()), Dimension::Units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dimensions_parse_units_or_css() {
        assert_eq!(dimension("32"), Dimension::Units(32.0));
        assert_eq!(dimension(" 1.5em "), Dimension::Css("1.5em".to_owned()));
    }

    #[test]
    fn render_flags_build_the_request() {
        let cli = Cli::parse_from(["arcade", "render", "home", "--size", "48", "--title", "Home"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.request(), IconRequest::new("home").size(48).title("Home"));
    }

    #[test]
    fn sprite_flags_override_config() {
        let cli = Cli::parse_from(["arcade", "list", "--assets-dir", "static", "--sprite-path", "/icons.svg"]);
        let mut config = AppConfig::default();
        config.icons.origin = Some("http://localhost".to_owned());
        cli.sprite.apply(&mut config);

        assert_eq!(config.icons.origin, None);
        assert_eq!(config.icons.assets_dir, PathBuf::from("static"));
        assert_eq!(config.icons.sprite_path, "/icons.svg");
    }
}
