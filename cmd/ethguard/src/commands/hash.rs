use clap::Args;
use ethguard_core::{config::DecoderConfig, decode_tx_with_config};

use super::read_raw_tx;

#[derive(Args)]
pub(crate) struct Command {
    #[arg(help = "Hex encoded raw transaction. Read from stdin when omitted.")]
    raw_tx: Option<String>,
}

impl Command {
    pub fn run(self, config: &DecoderConfig) -> eyre::Result<()> {
        let raw = read_raw_tx(self.raw_tx)?;
        let transaction = decode_tx_with_config(&raw, config)?;
        println!("signingHash: {:#x}", transaction.signing_hash);
        println!("hash: {:#x}", transaction.hash);
        Ok(())
    }
}
