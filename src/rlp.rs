//! RLP prefix-scheme codec (§4.4, §3 "RLP constants").
//!
//! This is a from-scratch re-implementation of the three encoders the
//! original Go `platon-test` harness exposed as host functions
//! (`rlp_u128`, `rlp_bytes`, `rlp_list`), not a wrapper around a generic RLP
//! crate — the prefix arithmetic here *is* the ABI contract guest contracts
//! link against, so it is pinned byte-for-byte to the original rather than
//! delegated to whatever a third-party encoder happens to produce.

use crate::error::HostError;

pub const MAX_LEN_BYTES: u32 = 8;
pub const DATA_IMM_START: u32 = 0x80;
pub const LIST_START: u32 = 0xc0;
pub const DATA_IMM_COUNT: u32 = LIST_START - DATA_IMM_START - MAX_LEN_BYTES;
pub const DATA_IND_ZERO: u32 = DATA_IMM_START + DATA_IMM_COUNT - 1;
pub const LIST_IMM_COUNT: u32 = 256 - LIST_START - MAX_LEN_BYTES;
pub const LIST_IND_ZERO: u32 = LIST_START + LIST_IMM_COUNT - 1;

/// Big-endian encoding of `num` with leading zero bytes suppressed. `0`
/// encodes as the empty slice, matching the original's `bigEndian` helper.
fn be_non_zero_suppressed(mut num: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    while num != 0 {
        bytes.push(num as u8);
        num >>= 8;
    }
    bytes.reverse();
    bytes
}

/// Byte length `platon_rlp_u128` will produce for `(high, low)`.
pub fn u128_size(high: u64, low: u64) -> u32 {
    if (high == 0 && low == 0) || (high == 0 && low < DATA_IMM_START as u64) {
        1
    } else {
        let mag_len = be_non_zero_suppressed(high).len() + be_non_zero_suppressed(low).len();
        mag_len as u32 + 1
    }
}

/// Encodes a u128 value split across two u64 limbs.
pub fn encode_u128(high: u64, low: u64) -> Vec<u8> {
    if high == 0 && low == 0 {
        return vec![DATA_IMM_START as u8];
    }
    if high == 0 && low < DATA_IMM_START as u64 {
        return vec![low as u8];
    }
    let mut mag = be_non_zero_suppressed(high);
    mag.extend(be_non_zero_suppressed(low));
    let mut out = Vec::with_capacity(mag.len() + 1);
    out.push((DATA_IMM_START as usize + mag.len()) as u8);
    out.extend(mag);
    out
}

/// Byte length `platon_rlp_bytes` will produce for a payload of length
/// `len` whose first byte (when `len >= 1`) is `first_byte`.
pub fn bytes_size(len: u32, first_byte: Option<u8>) -> Result<u32, HostError> {
    if len == 1 && first_byte.is_some_and(|b| (b as u32) < DATA_IMM_START) {
        return Ok(1);
    }
    if len < DATA_IMM_COUNT {
        return Ok(len + 1);
    }
    let length_bytes = be_non_zero_suppressed(len as u64);
    if length_bytes.len() as u32 + DATA_IND_ZERO > 0xff {
        return Err(HostError::RlpItemCountOverflow);
    }
    Ok(length_bytes.len() as u32 + len + 1)
}

/// Encodes an opaque byte string.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>, HostError> {
    let len = data.len() as u32;
    if len == 1 && (data[0] as u32) < DATA_IMM_START {
        return Ok(data.to_vec());
    }
    let mut prefix = Vec::new();
    if len < DATA_IMM_COUNT {
        prefix.push((DATA_IMM_START + len) as u8);
    } else {
        let length_bytes = be_non_zero_suppressed(len as u64);
        if length_bytes.len() as u32 + DATA_IND_ZERO > 0xff {
            return Err(HostError::RlpItemCountOverflow);
        }
        prefix.push((DATA_IND_ZERO + length_bytes.len() as u32) as u8);
        prefix.extend(length_bytes);
    }
    let mut out = prefix;
    out.extend_from_slice(data);
    Ok(out)
}

/// Byte length `platon_rlp_list` will produce for a pre-encoded child
/// payload of length `len`.
pub fn list_size(len: u32) -> Result<u32, HostError> {
    if len < LIST_IMM_COUNT {
        return Ok(len + 1);
    }
    let length_bytes = be_non_zero_suppressed(len as u64);
    // Checks the byte-string threshold here too, matching the Go source's
    // apparent copy-paste of that guard; both are unreachable for any
    // length that fits in a u32, so the two checks never actually diverge.
    if length_bytes.len() as u32 + DATA_IND_ZERO > 0xff {
        return Err(HostError::RlpItemCountOverflow);
    }
    Ok(length_bytes.len() as u32 + len + 1)
}

/// Encodes an opaque list payload (the already-encoded concatenation of
/// child items; this layer does not recurse).
pub fn encode_list(data: &[u8]) -> Result<Vec<u8>, HostError> {
    let len = data.len() as u32;
    let mut prefix = Vec::new();
    if len < LIST_IMM_COUNT {
        prefix.push((LIST_START + len) as u8);
    } else {
        let length_bytes = be_non_zero_suppressed(len as u64);
        if length_bytes.len() as u32 + DATA_IND_ZERO > 0xff {
            return Err(HostError::RlpItemCountOverflow);
        }
        prefix.push((LIST_IND_ZERO + length_bytes.len() as u32) as u8);
        prefix.extend(length_bytes);
    }
    let mut out = prefix;
    out.extend_from_slice(data);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_the_documented_layout() {
        assert_eq!(DATA_IMM_COUNT, 56);
        assert_eq!(DATA_IND_ZERO, 0xb7);
        assert_eq!(LIST_IMM_COUNT, 56);
        assert_eq!(LIST_IND_ZERO, 0xf7);
    }

    #[test]
    fn u128_empty() {
        assert_eq!(encode_u128(0, 0), vec![0x80]);
        assert_eq!(u128_size(0, 0), 1);
    }

    #[test]
    fn u128_small_self_delimited() {
        assert_eq!(encode_u128(0, 0x7f), vec![0x7f]);
        assert_eq!(u128_size(0, 0x7f), 1);
    }

    #[test]
    fn u128_just_above_single_byte_threshold() {
        assert_eq!(encode_u128(0, 0x80), vec![0x81, 0x80]);
        assert_eq!(u128_size(0, 0x80), 2);
    }

    #[test]
    fn u128_spans_both_limbs() {
        let enc = encode_u128(1, 0);
        // high=1 -> [0x01], low=0 -> [] ; mag = [0x01], prefix = 0x81
        assert_eq!(enc, vec![0x81, 0x01]);
    }

    #[test]
    fn bytes_short_circuit_for_single_small_byte() {
        let enc = encode_bytes(&[0x05]).unwrap();
        assert_eq!(enc, vec![0x05]);
        assert_eq!(bytes_size(1, Some(0x05)).unwrap(), 1);
    }

    #[test]
    fn bytes_single_byte_above_threshold_gets_prefixed() {
        let enc = encode_bytes(&[0x81]).unwrap();
        assert_eq!(enc, vec![0x81, 0x81]);
    }

    #[test]
    fn bytes_short_string() {
        let enc = encode_bytes(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(enc, vec![0x83, 0x01, 0x02, 0x03]);
        assert_eq!(bytes_size(3, Some(0x01)).unwrap(), 4);
    }

    #[test]
    fn bytes_empty_string_encodes_as_data_imm_start() {
        let enc = encode_bytes(&[]).unwrap();
        assert_eq!(enc, vec![0x80]);
    }

    #[test]
    fn bytes_long_string_uses_indirect_length() {
        let data = vec![0u8; 56];
        let enc = encode_bytes(&data).unwrap();
        assert_eq!(&enc[..2], &[0xb8, 0x38]);
        assert_eq!(enc.len(), 58);
        assert_eq!(bytes_size(56, Some(0)).unwrap(), 58);
    }

    #[test]
    fn list_empty_encodes_as_list_start() {
        let enc = encode_list(&[]).unwrap();
        assert_eq!(enc, vec![0xc0]);
    }

    #[test]
    fn list_short_payload() {
        let enc = encode_list(&[0x01, 0x02]).unwrap();
        assert_eq!(enc, vec![0xc2, 0x01, 0x02]);
        assert_eq!(list_size(2).unwrap(), 3);
    }

    #[test]
    fn list_long_payload_uses_indirect_length() {
        let data = vec![0u8; 56];
        let enc = encode_list(&data).unwrap();
        assert_eq!(&enc[..2], &[0xf8, 0x38]);
        assert_eq!(enc.len(), 58);
    }

    #[test]
    fn list_has_no_single_byte_short_circuit() {
        // A one-byte payload below DATA_IMM_START still gets a list prefix,
        // unlike the byte-string encoder.
        let enc = encode_list(&[0x05]).unwrap();
        assert_eq!(enc, vec![0xc1, 0x05]);
    }
}
