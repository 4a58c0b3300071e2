//! Command-line argument parsing for the orrery viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Sun, planet and meteor scene viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Directory holding the .obj models and .jpg textures.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// WGSL file replacing the built-in shader.
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref title) = args.title {
            self.window.title = title.clone();
        }
        if let Some(ref dir) = args.assets {
            self.assets.asset_dir = dir.clone();
        }
        if let Some(ref shader) = args.shader {
            self.render.shader_path = Some(shader.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1024),
            assets: Some(PathBuf::from("/opt/orrery")),
            shader: Some(PathBuf::from("custom.wgsl")),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.assets.asset_dir, PathBuf::from("/opt/orrery"));
        assert_eq!(
            config.render.shader_path,
            Some(PathBuf::from("custom.wgsl"))
        );
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 800);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "orrery",
            "--width",
            "640",
            "--log-level",
            "debug",
            "--config",
            "/tmp/orrery",
        ])
        .unwrap();
        assert_eq!(args.width, Some(640));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/orrery")));
        assert!(args.height.is_none());
    }
}
