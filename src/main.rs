mod app;
mod assets;
mod cli;
mod config;
mod error;
mod git;
mod html;
mod render;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    // Handle shell completion generation
    if let Some(shell) = args.completions {
        cli::generate_completions(shell);
        return Ok(());
    }

    let mut config = config::load();
    if let Some(dir) = &args.asset_dir {
        config.asset_dir = Some(dir.clone());
    }
    if let Some(ms) = args.timeout {
        config.render_timeout_ms = ms;
    }

    if args.fetch_assets {
        return app::fetch_assets(&config);
    }

    let app = app::App::new(&args, config)?;
    let path = app.run()?;
    eprintln!("Wrote {}", path.display());

    Ok(())
}
