//! # Config Commands

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use gently_sync::GentlyConfig;
use tracing::debug;

/// Prints the effective configuration (file + environment + defaults).
pub fn show(config: &GentlyConfig, out: &mut dyn Write) -> Result<()> {
    debug!("config show command");
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    write!(out, "{rendered}")?;
    Ok(())
}

/// Writes the default configuration, refusing to clobber unless `force`.
pub fn init(path: Option<PathBuf>, force: bool, out: &mut dyn Write) -> Result<PathBuf> {
    let target = path
        .or_else(GentlyConfig::default_config_path)
        .context("No config directory available; pass --config")?;

    if target.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    let written = GentlyConfig::default().save(Some(target))?;
    writeln!(out, "Wrote {}", written.display())?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_show_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gently.toml");

        let mut out = Vec::new();
        let written = init(Some(path.clone()), false, &mut out).unwrap();
        assert_eq!(written, path);

        let loaded: GentlyConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, GentlyConfig::default());

        let mut shown = Vec::new();
        show(&loaded, &mut shown).unwrap();
        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("name = \"GentlyDevice\""));
        assert!(shown.contains("[timing]"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gently.toml");
        std::fs::write(&path, "[device]\nname = \"Bedside\"\n").unwrap();

        let err = init(Some(path.clone()), false, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Bedside"));

        init(Some(path.clone()), true, &mut Vec::new()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("GentlyDevice"));
    }
}
