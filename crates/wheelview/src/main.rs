use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use sectorwheel::Widget;
use std::path::PathBuf;
use wheelview::config;
use wheelview::gui::app::AppModel;
use wheelview::sys::runtime;

#[derive(Parser, Debug)]
#[command(version, about = "Radial sector selector")]
struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.init {
        let path = config::write_default_config(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let mut wheel = Widget::new(config.wheel).context("invalid wheel configuration")?;
    wheel
        .measure(config.window.available_size())
        .context("window too small for the wheel")?;

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(config_path.clone(), tx);

    // GTK would otherwise try to parse our own flags
    RelmApp::new("org.sectorwheel.wheelview")
        .with_args(Vec::new())
        .run::<AppModel>((wheel, config.window, config_path, rx));

    Ok(())
}
