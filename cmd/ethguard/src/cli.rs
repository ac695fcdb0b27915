use crate::commands::{decode, hash};
use clap::{Args, Parser, Subcommand};
use ethguard_core::config::{read_env_file, read_env_file_from, DecoderConfig};
use tracing::debug;
use tracing_subscriber::{filter::Directive, EnvFilter, FmtSubscriber};

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ethguard", author, version = VERSION_STRING, about = "Inspect raw EIP-1559 transactions.", long_about = None)]
pub struct EthguardCLI {
    #[command(flatten)]
    opts: GlobalOpts,
    #[command(subcommand)]
    command: EthguardCommand,
}

#[derive(Args)]
struct GlobalOpts {
    #[arg(
        long = "log-level",
        default_value = "info",
        global = true,
        help = "Default log level, overridden by RUST_LOG."
    )]
    log_level: String,
    #[arg(
        long = "env-file",
        global = true,
        help = "File with ETHGUARD_* decoder settings. Defaults to ENV_FILE or .env when present."
    )]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum EthguardCommand {
    #[clap(about = "Break down a raw transaction and print it as JSON.")]
    Decode(decode::Command),
    #[clap(about = "Print the signing hash and transaction hash of a raw transaction.")]
    Hash(hash::Command),
}

pub fn start() -> eyre::Result<()> {
    let EthguardCLI { opts, command } = EthguardCLI::parse();
    init_tracing(&opts.log_level)?;

    match &opts.env_file {
        Some(path) => read_env_file_from(path)?,
        // Without an explicit file the default one is optional
        None => {
            if let Err(err) = read_env_file() {
                debug!("No env file loaded: {err}");
            }
        }
    }
    let config = DecoderConfig::from_env()?;
    debug!(?config, "Loaded decoder config");

    match command {
        EthguardCommand::Decode(cmd) => cmd.run(&config),
        EthguardCommand::Hash(cmd) => cmd.run(&config),
    }
}

fn init_tracing(log_level: &str) -> eyre::Result<()> {
    let log_filter = EnvFilter::builder()
        .with_default_directive(log_level.parse::<Directive>()?)
        .from_env_lossy();
    // stdout is reserved for command output
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
