//! Tests for CLI argument parsing.

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn parse_monitor_options() {
        let cli = Cli::parse_from_iter([
            "ipwatch",
            "--interval",
            "120",
            "--paused",
            "--provider-url",
            "https://ifconfig.me/ip",
        ]);

        assert_eq!(cli.interval, Some(120));
        assert!(cli.paused);
        assert_eq!(cli.provider_url.as_deref(), Some("https://ifconfig.me/ip"));
    }

    #[test]
    fn parse_misc_options() {
        let cli = Cli::parse_from_iter([
            "ipwatch",
            "--config",
            "/path/to/config.toml",
            "--log-file",
            "/var/log/ip.csv",
            "--no-bell",
            "--verbose",
        ]);

        assert_eq!(
            cli.config.as_ref().unwrap().to_str(),
            Some("/path/to/config.toml")
        );
        assert_eq!(
            cli.log_file.as_ref().unwrap().to_str(),
            Some("/var/log/ip.csv")
        );
        assert!(cli.no_bell);
        assert!(cli.verbose);
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from_iter(["ipwatch"]);

        // Optional fields have no defaults in CLI - None when not specified
        assert!(cli.command.is_none());
        assert!(cli.interval.is_none());
        assert!(cli.provider_url.is_none());
        assert!(cli.log_file.is_none());
        assert!(cli.config.is_none());
        // Boolean flags default to false
        assert!(!cli.paused);
        assert!(!cli.no_bell);
        assert!(!cli.verbose);
    }

    #[test]
    fn interval_must_be_a_number() {
        use clap::Parser;

        let result = Cli::try_parse_from(["ipwatch", "--interval", "soon"]);

        assert!(result.is_err());
    }
}

mod subcommands {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_init_with_default_output() {
        let cli = Cli::parse_from_iter(["ipwatch", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("ipwatch.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_custom_output() {
        let cli = Cli::parse_from_iter(["ipwatch", "init", "--output", "/custom/path/config.toml"]);

        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("/custom/path/config.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_show() {
        let text = Cli::parse_from_iter(["ipwatch", "show"]);
        let json = Cli::parse_from_iter(["ipwatch", "show", "--json"]);

        assert!(matches!(text.command, Some(Command::Show { json: false })));
        assert!(matches!(json.command, Some(Command::Show { json: true })));
        assert!(!json.is_init());
    }

    #[test]
    fn parse_clear() {
        let cli = Cli::parse_from_iter(["ipwatch", "clear"]);

        assert!(matches!(cli.command, Some(Command::Clear)));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from_iter(["ipwatch", "show", "--log-file", "other.csv", "-v"]);

        assert_eq!(cli.log_file, Some(PathBuf::from("other.csv")));
        assert!(cli.verbose);
    }

    #[test]
    fn is_init_false_for_run_mode() {
        let cli = Cli::parse_from_iter(["ipwatch", "--interval", "30"]);

        assert!(!cli.is_init());
    }
}
