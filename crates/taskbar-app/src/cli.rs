use std::path::PathBuf;

use clap::Parser;

/// Taskbar tabs: give installed web sites their own taskbar windows.
///
/// Speaks newline-delimited JSON with the browser host on stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "taskbar-tabs", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error), or a full filter
    /// directive such as `taskbar_routing=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// State file path override.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Disable taskbar grouping, window icons and launcher shortcuts.
    #[arg(long)]
    pub no_chrome: bool,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "taskbar-tabs",
            "--config",
            "/tmp/c.toml",
            "--log-level",
            "debug",
            "--no-chrome",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.no_chrome);
        assert!(!args.print_config);
        assert!(args.store.is_none());
    }
}
