use std::path::PathBuf;

use anyhow::Result;
use nbshare::config::Config;
use nbshare::logger::Logger;
use nbshare::ui;

fn print_usage() {
    println!("Usage: nbshare [--generate-config] [NOTEBOOK]");
    println!();
    println!("  NOTEBOOK            Notebook to publish and share from the document bar");
    println!("  --generate-config   Write a default configuration file and exit");
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut notebook: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "--generate-config" => {
                Config::generate_default_config(Config::get_default_config_path()?)?;
                return Ok(());
            }
            _ => notebook = Some(PathBuf::from(arg)),
        }
    }

    let config = Config::load()?;

    // Check if API token is set
    if config.server.api_token().is_none() {
        eprintln!("❌ Error: {} environment variable not set", config.server.api_token_env);
        eprintln!("\n💡 To use this app:");
        eprintln!("1. Create an API token on your sharing server ({})", config.server.base_url);
        eprintln!(
            "2. Set it as environment variable: export {}=your_token_here",
            config.server.api_token_env
        );
        eprintln!("3. Run the app again to see your shared notebooks!");
        return Ok(());
    }

    if let Some(path) = &notebook {
        if !path.exists() {
            eprintln!("❌ Error: {} does not exist", path.display());
            return Ok(());
        }
    }

    let logger = Logger::from_config(config.logging.enabled)?;
    logger.install(log::LevelFilter::Info)?;

    // Run the TUI application
    ui::run_app(config, logger, notebook).await?;

    Ok(())
}
