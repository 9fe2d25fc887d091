// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    run_ui_mode()
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    use anyhow::Context;
    use expense_tracker::{init_logging, AppConfig, AppContext};
    use log::info;

    let config = AppConfig::default();
    let _logger = init_logging(&config.log)?;

    let db_path = config.db_path.clone();
    let ctx = AppContext::open(config)
        .with_context(|| format!("Failed to open expense store at {}", db_path.display()))?;

    let mut app = ui::App::new(ctx).context("Failed to load expenses")?;
    ui::run_ui(&mut app)?;

    info!("event=app_exit module=main status=ok");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
