use std::io::Read;

use eyre::WrapErr;

pub(crate) mod decode;
pub(crate) mod hash;

/// Reads a hex encoded raw transaction from the argument, or from stdin when absent.
/// The `0x` prefix and surrounding whitespace are optional.
pub(crate) fn read_raw_tx(arg: Option<String>) -> eyre::Result<Vec<u8>> {
    let input = match arg {
        Some(input) => input,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .wrap_err("Failed to read transaction from stdin")?;
            input
        }
    };
    parse_hex(&input)
}

fn parse_hex(input: &str) -> eyre::Result<Vec<u8>> {
    let input = input.trim();
    let input = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(input).wrap_err("Raw transaction is not valid hex")
}
