use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use secp256k1::{
    constants::CURVE_ORDER,
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, SECP256K1,
};
use sha3::{Digest, Keccak256};
use tracing::{debug, trace};

use ethguard_rlp::{
    decode::RLPDecode,
    encode::{encode_length, list_header_length},
    error::RLPDecodeError,
    item::RLPItem,
};

use crate::{config::DecoderConfig, errors::TxDecodeError, registry::RestrictedAddresses};

pub use serde_impl::AccessListEntry;

/// EIP-2718 type byte of an EIP-1559 transaction.
pub const EIP1559_TX_TYPE: u8 = 0x02;
/// chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas_limit, to, value,
/// data, access_list, y_parity, r, s
pub const EIP1559_FIELD_COUNT: usize = 12;
/// The fields covered by the signature: everything before y_parity.
pub const EIP1559_SIGNED_FIELD_COUNT: usize = 9;

/// The transaction's kind: call or create.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TxKind {
    Call(Address),
    #[default]
    Create,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub y_parity: bool,
    pub r: U256,
    pub s: U256,
}

/// An EIP-1559 transaction broken down from its raw encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: u64,
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
    pub access_list: Vec<(Address, Vec<H256>)>,
    pub signature: Signature,
    /// Recovered from the signature over `signing_hash`.
    pub from: Address,
    /// keccak256 of the signing payload.
    pub signing_hash: H256,
    /// keccak256 of the raw transaction.
    pub hash: H256,
}

impl DecodedTransaction {
    pub fn is_contract_creation(&self) -> bool {
        matches!(self.to, TxKind::Create)
    }

    /// Whether the destination is on the registry's protected list.
    /// Contract creations have no destination and are never restricted.
    pub fn targets_restricted<R: RestrictedAddresses + ?Sized>(&self, registry: &R) -> bool {
        match &self.to {
            TxKind::Call(address) => registry.is_restricted_address(address),
            TxKind::Create => false,
        }
    }
}

/// Breaks down a raw `0x02 || rlp([...])` transaction using the default limits.
pub fn decode_tx(raw: &[u8]) -> Result<DecodedTransaction, TxDecodeError> {
    decode_tx_with_config(raw, &DecoderConfig::default())
}

/// Breaks down a raw `0x02 || rlp([...])` transaction, recovering the sender from
/// the signature. Fails as a whole: no partially decoded transaction is returned.
pub fn decode_tx_with_config(
    raw: &[u8],
    config: &DecoderConfig,
) -> Result<DecodedTransaction, TxDecodeError> {
    let result = breakdown(raw, config);
    match &result {
        Ok(tx) => trace!(hash = ?tx.hash, from = ?tx.from, "Decoded EIP-1559 transaction"),
        Err(err) => debug!(len = raw.len(), %err, "Rejected raw transaction"),
    }
    result
}

fn breakdown(raw: &[u8], config: &DecoderConfig) -> Result<DecodedTransaction, TxDecodeError> {
    if raw.len() > config.max_tx_size {
        return Err(TxDecodeError::OversizedTransaction {
            size: raw.len(),
            max: config.max_tx_size,
        });
    }

    let (tx_type, tx_rlp) = raw.split_first().ok_or(TxDecodeError::TruncatedInput)?;
    if *tx_type != EIP1559_TX_TYPE {
        return Err(TxDecodeError::UnsupportedTxType(*tx_type));
    }

    let decoded = RLPItem::decode_with_max_depth(tx_rlp, config.max_depth)?;
    let fields = decoded.as_list()?;
    let fields: &[RLPItem<'_>; EIP1559_FIELD_COUNT] = fields.try_into().map_err(|_| {
        malformed(format!(
            "expected {EIP1559_FIELD_COUNT} fields, found {}",
            fields.len()
        ))
    })?;
    let [chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas_limit, to, value, data, access_list, y_parity, r, s] =
        fields;

    let chain_id = decode_field(chain_id, "chain_id")?;
    let nonce = decode_field(nonce, "nonce")?;
    let max_priority_fee_per_gas =
        decode_field(max_priority_fee_per_gas, "max_priority_fee_per_gas")?;
    let max_fee_per_gas = decode_field(max_fee_per_gas, "max_fee_per_gas")?;
    let gas_limit = decode_field(gas_limit, "gas_limit")?;
    let to = decode_to(to)?;
    let value = decode_field(value, "value")?;
    let data = data
        .as_bytes()
        .map(Bytes::copy_from_slice)
        .map_err(|err| field_decode_error::<Bytes>("data", err))?;
    let access_list = decode_field(access_list, "access_list")?;
    let signature = Signature {
        y_parity: decode_y_parity(y_parity)?,
        r: decode_field(r, "signature_r")?,
        s: decode_field(s, "signature_s")?,
    };

    let payload = signing_payload(&fields[..EIP1559_SIGNED_FIELD_COUNT]);
    let signing_hash = keccak_hash::keccak(&payload);
    let from = recover_address(&signature, &signing_hash, config.require_low_s)?;

    Ok(DecodedTransaction {
        chain_id,
        nonce,
        max_priority_fee_per_gas,
        max_fee_per_gas,
        gas_limit,
        to,
        value,
        data,
        access_list,
        signature,
        from,
        signing_hash,
        hash: keccak_hash::keccak(raw),
    })
}

/// Rebuilds the bytes the sender signed: the type byte followed by a list of the
/// given fields, each copied exactly as it was received.
pub fn signing_payload(signed_fields: &[RLPItem<'_>]) -> Vec<u8> {
    let payload_len: usize = signed_fields
        .iter()
        .map(|field| field.raw_encoding().len())
        .sum();
    let mut buf = Vec::with_capacity(1 + list_header_length(payload_len) + payload_len);
    buf.push(EIP1559_TX_TYPE);
    encode_length(payload_len, &mut buf);
    for field in signed_fields {
        buf.extend_from_slice(field.raw_encoding());
    }
    buf
}

fn decode_field<T: RLPDecode>(item: &RLPItem<'_>, name: &str) -> Result<T, TxDecodeError> {
    item.decode_as::<T>()
        .map_err(|err| field_decode_error::<T>(name, err))
}

fn decode_to(item: &RLPItem<'_>) -> Result<TxKind, TxDecodeError> {
    let bytes = item
        .as_bytes()
        .map_err(|err| field_decode_error::<Address>("to", err))?;
    match bytes.len() {
        0 => Ok(TxKind::Create),
        20 => Ok(TxKind::Call(Address::from_slice(bytes))),
        len => Err(malformed(format!(
            "Error decoding field 'to': expected 0 or 20 bytes, found {len}"
        ))),
    }
}

fn decode_y_parity(item: &RLPItem<'_>) -> Result<bool, TxDecodeError> {
    match decode_field::<u64>(item, "signature_y_parity")? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(TxDecodeError::SignatureRecoveryFailed(format!(
            "y parity must be 0 or 1, found {other}"
        ))),
    }
}

/// Encoding problems keep their kind; a well-formed item of the wrong shape for
/// the field makes the transaction malformed.
fn field_decode_error<T>(field_name: &str, err: RLPDecodeError) -> TxDecodeError {
    match err {
        RLPDecodeError::UnexpectedVariant { .. } | RLPDecodeError::LengthMismatch => {
            let typ = std::any::type_name::<T>();
            malformed(format!(
                "Error decoding field '{field_name}' of type {typ}: {err}"
            ))
        }
        other => other.into(),
    }
}

fn malformed(msg: String) -> TxDecodeError {
    TxDecodeError::MalformedTransaction(msg)
}

fn recovery_failed(msg: impl ToString) -> TxDecodeError {
    TxDecodeError::SignatureRecoveryFailed(msg.to_string())
}

fn recover_address(
    signature: &Signature,
    signing_hash: &H256,
    require_low_s: bool,
) -> Result<Address, TxDecodeError> {
    let curve_order = U256::from_big_endian(&CURVE_ORDER);
    for (name, value) in [("r", signature.r), ("s", signature.s)] {
        if value.is_zero() || value >= curve_order {
            return Err(recovery_failed(format!("{name} is outside [1, n - 1]")));
        }
    }
    if require_low_s && signature.s > curve_order / U256::from(2) {
        return Err(recovery_failed("s is in the upper half of the curve order"));
    }

    // Create signature
    let mut signature_bytes = [0; 64];
    signature.r.to_big_endian(&mut signature_bytes[0..32]);
    signature.s.to_big_endian(&mut signature_bytes[32..]);
    let recovery_id = RecoveryId::from_i32(signature.y_parity as i32).map_err(recovery_failed)?;
    let signature = RecoverableSignature::from_compact(&signature_bytes, recovery_id)
        .map_err(recovery_failed)?;
    // Recover public key
    let public = SECP256K1
        .recover_ecdsa(&Message::from_digest(signing_hash.0), &signature)
        .map_err(recovery_failed)?;
    // Hash public key to obtain address
    let hash = Keccak256::new_with_prefix(&public.serialize_uncompressed()[1..]).finalize();
    Ok(Address::from_slice(&hash[12..]))
}

// Serialization
// This is used by the CLI to print decoded transactions

mod serde_impl {
    use serde::{ser::SerializeStruct, Serialize};

    use super::*;

    impl Serialize for TxKind {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            match self {
                TxKind::Call(address) => serializer.serialize_str(&format!("{:#x}", address)),
                TxKind::Create => serializer.serialize_none(),
            }
        }
    }

    #[derive(Serialize, Debug, PartialEq, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct AccessListEntry {
        pub address: Address,
        pub storage_keys: Vec<H256>,
    }

    impl From<&(Address, Vec<H256>)> for AccessListEntry {
        fn from(value: &(Address, Vec<H256>)) -> AccessListEntry {
            AccessListEntry {
                address: value.0,
                storage_keys: value.1.clone(),
            }
        }
    }

    impl Serialize for DecodedTransaction {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            let mut struct_serializer = serializer.serialize_struct("DecodedTransaction", 16)?;
            struct_serializer.serialize_field("type", &format!("{:#x}", EIP1559_TX_TYPE))?;
            struct_serializer.serialize_field("hash", &self.hash)?;
            struct_serializer.serialize_field("signingHash", &self.signing_hash)?;
            struct_serializer.serialize_field("chainId", &format!("{:#x}", self.chain_id))?;
            struct_serializer.serialize_field("nonce", &format!("{:#x}", self.nonce))?;
            struct_serializer.serialize_field("from", &self.from)?;
            struct_serializer.serialize_field("to", &self.to)?;
            struct_serializer.serialize_field("value", &self.value)?;
            struct_serializer.serialize_field("input", &format!("0x{:x}", self.data))?;
            struct_serializer.serialize_field("gas", &format!("{:#x}", self.gas_limit))?;
            struct_serializer
                .serialize_field("maxPriorityFeePerGas", &self.max_priority_fee_per_gas)?;
            struct_serializer.serialize_field("maxFeePerGas", &self.max_fee_per_gas)?;
            struct_serializer.serialize_field(
                "accessList",
                &self
                    .access_list
                    .iter()
                    .map(AccessListEntry::from)
                    .collect::<Vec<_>>(),
            )?;
            struct_serializer
                .serialize_field("yParity", &format!("{:#x}", self.signature.y_parity as u8))?;
            struct_serializer.serialize_field("r", &self.signature.r)?;
            struct_serializer.serialize_field("s", &self.signature.s)?;
            struct_serializer.end()
        }
    }
}
