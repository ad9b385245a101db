//! Account-server backend CLI
//!
//! Opens one session per invocation and runs a single file operation in it.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use accountserver::config::{default_config_path, Config};
use accountserver::{AccountServer, TYPE_NAME};
use backend::{Backend, Driver, Params, Registry, TYPE_PARAM};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Account-server backend - authenticated, per-user file access.
#[derive(Parser, Debug)]
#[command(name = "accountserver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session parameter, repeatable (e.g. -p username=alice)
    #[arg(short = 'p', long = "param", global = true, value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the login form as JSON
    Form,

    /// Check session parameters against the connection profiles
    Validate,

    /// List a directory
    Ls {
        /// Session-relative path
        #[arg(default_value = "/")]
        path: String,
    },

    /// Write a file to stdout
    Cat { path: String },

    /// Store stdin into a file
    Put { path: String },

    /// Create a directory
    Mkdir { path: String },

    /// Remove a file or empty directory
    Rm { path: String },

    /// Rename a file or directory
    Mv { from: String, to: String },

    /// Create a file if it does not exist
    Touch { path: String },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse a `KEY=VALUE` session parameter.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))
}

/// Collect session parameters, defaulting `type` to this backend.
fn session_params(pairs: &[(String, String)]) -> Params {
    let mut params: Params = pairs.iter().cloned().collect();
    params
        .entry(TYPE_PARAM.to_string())
        .or_insert_with(|| TYPE_NAME.to_string());
    params
}

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `--verbose`, which wins over `level`. A second call
/// keeps the subscriber already installed.
fn init_tracing(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    // Writing a fresh file must work even when the current one is broken.
    if let Commands::Config(ConfigCommands::Init { force }) = &cli.command {
        init_tracing(cli.verbose, "info");
        return write_default_config(&config_path, *force);
    }

    let mut config = Config::load(&config_path)?;
    let overrides = config.apply_env_overrides();

    init_tracing(cli.verbose, &config.logging.log_level.to_lowercase());
    if config_path.exists() {
        tracing::debug!("Using config file: {:?}", config_path);
    } else {
        tracing::debug!("Config file not found at {:?}, using defaults", config_path);
    }
    for applied in &overrides {
        applied.log();
    }

    if let Commands::Config(ConfigCommands::Show) = &cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    config.validate()?;

    let driver = AccountServer::new(&config)?;
    let params = session_params(&cli.params);

    match &cli.command {
        Commands::Form => {
            println!("{}", serde_json::to_string_pretty(&driver.login_form())?);
        }
        Commands::Validate => {
            driver.validate(&params)?;
            println!("ok");
        }
        command => {
            let mut registry = Registry::new();
            registry.register(Box::new(driver));
            let session = registry.init(&params)?;
            run_file_command(session.as_ref(), command)?;
        }
    }

    Ok(())
}

fn run_file_command(session: &dyn Backend, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Ls { path } => {
            for entry in session.ls(path)? {
                let suffix = if entry.is_dir() { "/" } else { "" };
                println!(
                    "{:o}\t{}\t{}\t{}{}",
                    entry.mode, entry.size, entry.modified, entry.name, suffix
                );
            }
        }
        Commands::Cat { path } => {
            let mut reader = session.cat(path)?;
            let mut stdout = io::stdout().lock();
            io::copy(&mut reader, &mut stdout)?;
            stdout.flush()?;
        }
        Commands::Put { path } => {
            let mut stdin = io::stdin().lock();
            session.save(path, &mut stdin as &mut dyn Read)?;
        }
        Commands::Mkdir { path } => session.mkdir(path)?,
        Commands::Rm { path } => session.rm(path)?,
        Commands::Mv { from, to } => session.mv(from, to)?,
        Commands::Touch { path } => session.touch(path)?,
        Commands::Form | Commands::Validate | Commands::Config(_) => {}
    }
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    fn cli(config: &Path, args: &[&str]) -> Cli {
        let config = config.to_string_lossy().to_string();
        let mut argv = vec!["accountserver", "-c", config.as_str()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("url=http://svc:8000/?a=b"),
            Ok(("url".to_string(), "http://svc:8000/?a=b".to_string()))
        );
        assert_eq!(
            parse_param("password="),
            Ok(("password".to_string(), String::new()))
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_session_params_defaults_type() {
        let params = session_params(&[("username".to_string(), "alice".to_string())]);
        assert_eq!(params.get("type").map(String::as_str), Some("accountserver"));

        let params = session_params(&[("type".to_string(), "sftp".to_string())]);
        assert_eq!(params.get("type").map(String::as_str), Some("sftp"));
    }

    #[test]
    fn test_cli_parses_params_and_command() {
        let cli = Cli::try_parse_from([
            "accountserver",
            "-p",
            "username=alice",
            "--param",
            "password=x",
            "mv",
            "a.txt",
            "b.txt",
        ])
        .unwrap();

        assert_eq!(cli.params.len(), 2);
        assert!(matches!(
            cli.command,
            Commands::Mv { ref from, ref to } if from == "a.txt" && to == "b.txt"
        ));
    }

    #[test]
    fn test_cli_ls_default_path() {
        let cli = Cli::try_parse_from(["accountserver", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::Ls { ref path } if path == "/"));
    }

    #[test]
    fn test_config_init_force_replaces_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "not toml [").unwrap();

        run(cli(&path, &["config", "init", "--force"])).unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_config_init_force_replaces_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

        run(cli(&path, &["config", "init", "--force"])).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_init_keeps_existing_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "not toml [").unwrap();

        assert!(run(cli(&path, &["config", "init"])).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not toml [");
    }

    #[test]
    fn test_config_show_skips_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

        assert!(run(cli(&path, &["config", "show"])).is_ok());
    }

    #[test]
    fn test_file_commands_still_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

        let err = run(cli(&path, &["validate"])).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"), "{err}");
    }

    #[test]
    fn test_validate_uses_configured_profiles() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[[connections]]\ntype = \"accountserver\"\nurl = \"http://svc:8000\"\n",
        )
        .unwrap();

        assert!(run(cli(&path, &["-p", "url=http://svc:8000", "validate"])).is_ok());
        assert!(run(cli(&path, &["-p", "url=http://other:8000", "validate"])).is_err());
    }
}
