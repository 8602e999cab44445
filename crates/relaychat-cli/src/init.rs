//! `relaychat init`: write a config file with defaults.
//!
//! Creates `~/.relaychat/config.json` and the history directory. An existing
//! config is left alone unless `--force` is given.

use anyhow::{Context, Result};
use colored::Colorize;

use relaychat_core::config::{get_config_path, save_config, Config};
use relaychat_core::utils::get_data_path;

/// Run the init command.
pub fn run(force: bool) -> Result<()> {
    println!();
    println!("{}", "💬 relaychat setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if config_path.exists() && !force {
        println!(
            "  {} config already exists at {} (use --force to overwrite)",
            "✓".green(),
            config_path.display()
        );
    } else {
        save_config(&Config::default(), Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("  {} created config at {}", "✓".green(), config_path.display());
    }

    let history_dir = get_data_path().join("history");
    std::fs::create_dir_all(&history_dir)
        .with_context(|| format!("failed to create {}", history_dir.display()))?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Put your key in CLAUDE_API_KEY (or relay.apiKey in the config)");
    println!("  2. Start the relay:  {}", "relaychat serve".cyan());
    println!("  3. Start chatting:   {}", "relaychat chat".cyan());
    println!();

    Ok(())
}
