//! Tests for value validation.

use std::path::{Path, PathBuf};

use crate::config::expand_tilde;
use crate::monitor::IntervalError;

use super::*;

mod interval {
    use super::*;

    #[test]
    fn bounds_are_accepted() {
        for secs in ["10", "3600"] {
            let config = ValidatedConfig::from_raw(&cli(&["--interval", secs]), None).unwrap();
            assert_eq!(config.interval.as_secs().to_string(), secs);
        }
    }

    #[test]
    fn below_minimum_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--interval", "9"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidInterval(IntervalError { secs: 9 }))
        ));
    }

    #[test]
    fn above_maximum_in_toml_is_rejected() {
        let toml = toml("[monitor]\ninterval = 7200");

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidInterval(_))));
    }

    #[test]
    fn zero_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--interval", "0"]), None);

        assert!(result.is_err());
    }
}

mod provider_url {
    use super::*;

    #[test]
    fn malformed_url_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--provider-url", "not a url"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let result =
            ValidatedConfig::from_raw(&cli(&["--provider-url", "ftp://example.com/ip"]), None);

        match result {
            Err(ConfigError::InvalidUrl { url, reason }) => {
                assert_eq!(url, "ftp://example.com/ip");
                assert!(reason.contains("ftp"));
            }
            other => panic!("Expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn plain_http_is_accepted() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--provider-url", "http://10.0.0.1:8080/ip"]), None)
                .unwrap();

        assert_eq!(config.provider_url.port(), Some(8080));
    }
}

mod log_file {
    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        let toml = toml("[log]\nfile = \"\"");

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::EmptyLogFile)));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        let config = ValidatedConfig::from_raw(&cli(&["--log-file", "~/logs/ip.csv"]), None)
            .unwrap();

        assert_eq!(config.log_file, home.join("logs").join("ip.csv"));
    }

    #[test]
    fn bare_tilde_is_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        assert_eq!(expand_tilde(Path::new("~")), home);
    }

    #[test]
    fn other_paths_are_unchanged() {
        assert_eq!(
            expand_tilde(Path::new("/var/log/ip.csv")),
            PathBuf::from("/var/log/ip.csv")
        );
        assert_eq!(
            expand_tilde(Path::new("~user/ip.csv")),
            PathBuf::from("~user/ip.csv")
        );
        assert_eq!(
            expand_tilde(Path::new("logs/~/ip.csv")),
            PathBuf::from("logs/~/ip.csv")
        );
    }
}
