//! `multibuild config` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use multibuild::core::platform::PlatformId;
use multibuild::util::config::{BuildConfig, ConfigStore};

use crate::cli::{Cli, ConfigAction, ConfigArgs};
use crate::commands::config_store;

pub fn execute(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let store = config_store(cli)?;

    match &args.action {
        ConfigAction::Show => {
            let config = store.load()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = store.load()?;
            set_field(&mut config, key, value)?;
            store.save(&config)?;
            eprintln!("       Saved {}", store.path().display());
            Ok(())
        }
        ConfigAction::Reset => {
            store.reset()?;
            eprintln!("       Reset {} to defaults", cli.app);
            Ok(())
        }
    }
}

/// Apply one `key value` edit to the settings.
fn set_field(config: &mut BuildConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "name" => config.name = value.to_string(),
        "output-root" => config.output_root = PathBuf::from(value),
        "platforms" => {
            config.platforms = value
                .split(',')
                .map(|s| s.trim().parse::<PlatformId>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow::anyhow!("{}", e))?;
        }
        "servers" => config.bundle_server_variant = parse_bool(value)?,
        "copy-folder" => config.copy_folder = parse_bool(value)?,
        "copy-folder-path" => config.copy_folder_path = PathBuf::from(value),
        "development" => config.development = parse_bool(value)?,
        "stamped-subdir" => config.stamped_subdir = parse_bool(value)?,
        "backend.program" => config.backend.program = value.to_string(),
        "backend.args" => {
            config.backend.args = value.split_whitespace().map(String::from).collect();
        }
        "mirror.exclude-extensions" => {
            config.mirror.exclude_extensions =
                value.split(',').map(|s| s.trim().to_string()).collect();
        }
        _ => bail!(
            "unknown settings key '{}'\n\
             known keys: name, output-root, platforms, servers, copy-folder, \
             copy-folder-path, development, stamped-subdir, backend.program, \
             backend.args, mirror.exclude-extensions",
            key
        ),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => bail!("expected a boolean, got '{}'", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_platforms() {
        let mut config = BuildConfig::defaults_for("x");
        set_field(&mut config, "platforms", "linux, windows").unwrap();
        assert_eq!(
            config.platforms,
            vec![PlatformId::Linux, PlatformId::Windows]
        );
    }

    #[test]
    fn test_set_field_backend_program() {
        let mut config = BuildConfig::defaults_for("x");
        set_field(&mut config, "backend.program", "unity-builder").unwrap();
        assert_eq!(config.backend.program, "unity-builder");
    }

    #[test]
    fn test_set_field_bool_variants() {
        let mut config = BuildConfig::defaults_for("x");
        set_field(&mut config, "servers", "on").unwrap();
        assert!(config.bundle_server_variant);
        set_field(&mut config, "servers", "0").unwrap();
        assert!(!config.bundle_server_variant);
        assert!(set_field(&mut config, "servers", "maybe").is_err());
    }

    #[test]
    fn test_set_field_unknown_key() {
        let mut config = BuildConfig::defaults_for("x");
        let err = set_field(&mut config, "nope", "x").unwrap_err();
        assert!(err.to_string().contains("unknown settings key"));
    }
}
