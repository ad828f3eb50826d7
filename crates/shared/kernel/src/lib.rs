//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it owns the layered config loader.
//!
//! ## Config loading
//! ```rust,no_run
//! use arcade_kernel::config::load_app_config;
//!
//! let cfg = load_app_config(None::<&str>).unwrap();
//! assert_eq!(cfg.icons.sprite_path, "/sprite.svg");
//! ```

pub mod config;

pub use arcade_domain as domain;
