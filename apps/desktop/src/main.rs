#![windows_subsystem = "windows"]

use arcade::kernel::config::load_app_config;
use arcade_desktop::DesktopApp;
use arcade_logger::Logger;

fn main() -> anyhow::Result<()> {
    let config = load_app_config(None::<&str>)?;
    let _logger = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging)?;

    DesktopApp::new().with_icons(config.icons.clone()).launch()?;

    Ok(())
}
