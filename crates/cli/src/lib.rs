use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bbuddy-relay")]
#[command(about = "Barcode Buddy relay - scanner page and API forwarder")]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the relay (default when no command is given)
    Start(StartArgs),

    /// Load and validate configuration without starting the relay
    Validate(EnvFileArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EnvFileArgs {
    /// Env file to load before reading the environment
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Skip loading the env file
    #[arg(long, conflicts_with = "env_file")]
    pub no_env_file: bool,
}

impl Default for EnvFileArgs {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            no_env_file: false,
        }
    }
}

impl EnvFileArgs {
    /// Env file to load, if any
    pub fn path(&self) -> Option<&PathBuf> {
        (!self.no_env_file).then_some(&self.env_file)
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StartArgs {
    /// Override the bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port (otherwise PORT, then 8080)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Serve Prometheus metrics on this port
    #[arg(long)]
    pub metrics_port: Option<u16>,

    #[command(flatten)]
    pub env: EnvFileArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable, colored
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
    /// Single-line, less verbose
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run; bare invocation means `start` with defaults
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Start(StartArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_starts() {
        let cli = Cli::try_parse_from(["bbuddy-relay"]).unwrap();
        assert_eq!(cli.log_format, LogFormatArg::Pretty);

        let Commands::Start(args) = cli.command() else {
            panic!("expected start");
        };
        assert_eq!(args.port, None);
        assert_eq!(args.env.path(), Some(&PathBuf::from(".env")));
    }

    #[test]
    fn test_start_overrides() {
        let cli = Cli::try_parse_from([
            "bbuddy-relay",
            "--log-format",
            "json",
            "start",
            "--host",
            "127.0.0.1",
            "-p",
            "9000",
            "--metrics-port",
            "9100",
            "--no-env-file",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormatArg::Json);
        let Some(Commands::Start(args)) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.metrics_port, Some(9100));
        assert_eq!(args.env.path(), None);
    }

    #[test]
    fn test_validate_with_env_file() {
        let cli =
            Cli::try_parse_from(["bbuddy-relay", "validate", "--env-file", "relay.env"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Validate(EnvFileArgs {
                env_file: PathBuf::from("relay.env"),
                no_env_file: false,
            }))
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["bbuddy-relay", "start", "--port", "70000"]).is_err());
        assert!(Cli::try_parse_from(["bbuddy-relay", "--log-format", "xml"]).is_err());
        assert!(Cli::try_parse_from([
            "bbuddy-relay",
            "validate",
            "--env-file",
            "a.env",
            "--no-env-file"
        ])
        .is_err());
    }
}
