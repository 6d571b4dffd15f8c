use crate::DomainError;
use data_encoding::{Encoding, BASE32, HEXLOWER};
use std::sync::LazyLock;

const GROUP_LEN: usize = 8;
const PAD: char = '=';

/// RFC 4648 base-32 that ignores unused bits in the final symbol.
static BASE32_LENIENT: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = BASE32.specification();
    spec.check_trailing_bits = false;
    spec.encoding().unwrap_or_else(|_| BASE32.clone())
});

/// Bytes recovered from an identifier label. Only ever built from a
/// complete, successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBuffer(Vec<u8>);

impl DecodedBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.0)
    }
}

/// Filler characters needed to complete the last 8-symbol group, or `None`
/// when a group of that size cannot come out of a base-32 encoder.
///
/// A trailing group of `n` symbols carries `5n` bits; if five or more are
/// left over after the last full byte, one symbol encodes nothing.
pub fn padding_len(len: usize) -> Option<usize> {
    let remainder = len % GROUP_LEN;
    if (remainder * 5) % 8 >= 5 {
        return None;
    }
    Some((GROUP_LEN - remainder) % GROUP_LEN)
}

/// Upper-cases the label, restores its `=` padding and decodes it with the
/// RFC 4648 base-32 alphabet.
pub fn decode_identifier(identifier: &str) -> Result<DecodedBuffer, DomainError> {
    if identifier.is_empty() {
        return Err(DomainError::InvalidIdentifier("empty identifier".to_string()));
    }

    let pad = padding_len(identifier.len()).ok_or_else(|| {
        DomainError::InvalidIdentifier(format!(
            "'{}' has an impossible base-32 length {}",
            identifier,
            identifier.len()
        ))
    })?;

    let mut padded = identifier.to_ascii_uppercase();
    padded.extend(std::iter::repeat(PAD).take(pad));

    BASE32_LENIENT
        .decode(padded.as_bytes())
        .map(DecodedBuffer)
        .map_err(|e| DomainError::InvalidIdentifier(format!("'{}': {}", identifier, e)))
}
