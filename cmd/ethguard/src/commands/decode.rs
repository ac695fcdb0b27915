use clap::Args;
use ethereum_types::Address;
use ethguard_core::{config::DecoderConfig, decode_tx_with_config, DecodedTransaction};
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use super::read_raw_tx;

#[derive(Args)]
pub(crate) struct Command {
    #[arg(help = "Hex encoded raw transaction. Read from stdin when omitted.")]
    raw_tx: Option<String>,
    #[arg(
        long = "restricted",
        value_name = "ADDRESS",
        help = "Address to treat as restricted. Can be repeated."
    )]
    restricted: Vec<Address>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeOutput<'a> {
    #[serde(flatten)]
    transaction: &'a DecodedTransaction,
    targets_restricted: bool,
}

impl Command {
    pub fn run(self, config: &DecoderConfig) -> eyre::Result<()> {
        let raw = read_raw_tx(self.raw_tx)?;
        let transaction = decode_tx_with_config(&raw, config)?;

        let restricted: HashSet<Address> = self.restricted.into_iter().collect();
        let targets_restricted = transaction.targets_restricted(&restricted);
        if targets_restricted {
            warn!(to = ?transaction.to, hash = ?transaction.hash, "Transaction targets a restricted address");
        }

        let output = DecodeOutput {
            transaction: &transaction,
            targets_restricted,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
