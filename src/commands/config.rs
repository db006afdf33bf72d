use anyhow::Result;
use calgrid_core::CalgridConfig;
use owo_colors::OwoColorize;

pub fn run(init: bool) -> Result<()> {
    let config_path = CalgridConfig::config_path()?;

    if init {
        if config_path.exists() {
            anyhow::bail!("Config file already exists at {}", config_path.display());
        }
        CalgridConfig::create_default_config(&config_path)?;
        println!("Created {}", config_path.display());
        return Ok(());
    }

    let status = if config_path.exists() {
        String::new()
    } else {
        format!(" {}", "(not created, run `calgrid config --init`)".dimmed())
    };

    println!("{}", "Paths".bold());
    println!("  Config:  {}{}", config_path.display(), status);

    Ok(())
}
