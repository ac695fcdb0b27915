use ethereum_types::{Address, H256, U256};
use ethguard_rlp::encode::{encode_bytes, encode_length};
use secp256k1::{Message, SecretKey, SECP256K1};
use sha3::{Digest, Keccak256};

use super::transaction::EIP1559_TX_TYPE;

pub const TEST_SECRET_KEY: [u8; 32] = [0x11; 32];

/// Field values of a transaction before signing.
#[derive(Clone, Debug)]
pub struct UnsignedTx {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u64,
    pub max_fee_per_gas: u64,
    pub gas_limit: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub access_list: Vec<(Address, Vec<H256>)>,
}

pub struct SignedTx {
    /// Encoded fields, signature included.
    pub fields: Vec<Vec<u8>>,
    pub payload: Vec<u8>,
    pub raw: Vec<u8>,
    pub y_parity: u64,
    /// r || s
    pub compact: [u8; 64],
}

pub fn encode_uint(value: U256) -> Vec<u8> {
    let mut be = [0; 32];
    value.to_big_endian(&mut be);
    let start = be.iter().position(|byte| *byte != 0).unwrap_or(be.len());
    let mut buf = Vec::new();
    encode_bytes(&be[start..], &mut buf);
    buf
}

pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload = items.concat();
    let mut buf = Vec::new();
    encode_length(payload.len(), &mut buf);
    buf.extend(payload);
    buf
}

fn encode_unsigned(tx: &UnsignedTx) -> Vec<Vec<u8>> {
    let mut to = Vec::new();
    encode_bytes(
        tx.to.as_ref().map(|to| to.as_bytes()).unwrap_or(&[]),
        &mut to,
    );
    let mut data = Vec::new();
    encode_bytes(&tx.data, &mut data);
    let access_list = tx
        .access_list
        .iter()
        .map(|(address, keys)| {
            let mut address_rlp = Vec::new();
            encode_bytes(address.as_bytes(), &mut address_rlp);
            let keys = keys
                .iter()
                .map(|key| {
                    let mut key_rlp = Vec::new();
                    encode_bytes(key.as_bytes(), &mut key_rlp);
                    key_rlp
                })
                .collect::<Vec<_>>();
            encode_list(&[address_rlp, encode_list(&keys)])
        })
        .collect::<Vec<_>>();

    vec![
        encode_uint(tx.chain_id.into()),
        encode_uint(tx.nonce.into()),
        encode_uint(tx.max_priority_fee_per_gas.into()),
        encode_uint(tx.max_fee_per_gas.into()),
        encode_uint(tx.gas_limit.into()),
        to,
        encode_uint(tx.value),
        data,
        encode_list(&access_list),
    ]
}

/// Encodes and signs `tx` the way a wallet would.
pub fn sign_fields(tx: &UnsignedTx, secret_key: &SecretKey) -> SignedTx {
    let mut fields = encode_unsigned(tx);

    let mut payload = vec![EIP1559_TX_TYPE];
    payload.extend(encode_list(&fields));
    let signing_hash = keccak_hash::keccak(&payload);

    let (recovery_id, compact) = SECP256K1
        .sign_ecdsa_recoverable(&Message::from_digest(signing_hash.0), secret_key)
        .serialize_compact();
    let y_parity = recovery_id.to_i32() as u64;
    fields.push(encode_uint(y_parity.into()));
    fields.push(encode_uint(U256::from_big_endian(&compact[..32])));
    fields.push(encode_uint(U256::from_big_endian(&compact[32..])));

    let mut raw = vec![EIP1559_TX_TYPE];
    raw.extend(encode_list(&fields));

    SignedTx {
        fields,
        payload,
        raw,
        y_parity,
        compact,
    }
}

pub fn address_of(secret_key: &SecretKey) -> Address {
    let public_key = secret_key.public_key(SECP256K1).serialize_uncompressed();
    let hash = Keccak256::digest(&public_key[1..]);
    Address::from_slice(&hash[12..])
}
