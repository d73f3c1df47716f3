//! Fixed-width signed-magnitude bigint arithmetic (§4.5).
//!
//! A bigint argument is a pair `(bytes[arr_size], negative_flag)`: bytes are
//! big-endian, right-aligned, signed-magnitude. Results are written
//! right-aligned into a caller-provided `arr_size`-byte slot, high-side
//! truncated with an overflow bit set when the magnitude doesn't fit.
//!
//! Arithmetic itself is delegated to `num-bigint`'s arbitrary-precision
//! `BigInt`, which — like the original Go `math/big.Int` this replaces —
//! implements bitwise AND/OR/XOR as if operands were encoded in infinite
//! two's-complement, so `BigInt`'s own bitwise operators already match the
//! "bitwise on sign-extended operands" wording in the ABI notes without any
//! manual sign-extension step here.

use crate::error::HostError;
use num_bigint::{BigInt, BigUint, Sign};

/// Overflow bit (0x02): the magnitude exceeded `arr_size` and was truncated.
pub const FLAG_OVERFLOW: u32 = 0x02;
/// Negative bit (0x01): the result is negative.
pub const FLAG_NEGATIVE: u32 = 0x01;

pub const OP_ADD: u32 = 0x01;
pub const OP_SUB: u32 = 0x02;
pub const OP_MUL: u32 = 0x04;
pub const OP_DIV: u32 = 0x08;
pub const OP_MOD: u32 = 0x10;
pub const OP_AND: u32 = 0x20;
pub const OP_OR: u32 = 0x40;
pub const OP_XOR: u32 = 0x80;

pub const DIRECTION_LEFT: u32 = 0x01;
pub const DIRECTION_RIGHT: u32 = 0x02;

/// Reconstructs a signed-magnitude value from its big-endian byte
/// representation and sign flag. `negative` is "nonzero means negative",
/// matching the ABI's `uint8_t`/`uint32_t` sign parameters.
pub fn from_signed_magnitude(bytes: &[u8], negative: u32) -> BigInt {
    let sign = if negative != 0 { Sign::Minus } else { Sign::Plus };
    BigInt::from_bytes_be(sign, bytes)
}

/// Writes `value`'s magnitude right-aligned into an `arr_size`-byte slot,
/// zeroing the slot first and truncating high-order bytes on overflow.
/// Returns the two-bit flag word.
pub fn write_signed_magnitude(value: &BigInt, arr_size: usize) -> (Vec<u8>, u32) {
    let (sign, magnitude) = value.to_bytes_be();
    let mut slot = vec![0u8; arr_size];
    let mut flags = 0u32;
    if sign == Sign::Minus {
        flags |= FLAG_NEGATIVE;
    }
    let mag_len = magnitude.len();
    if mag_len > arr_size {
        flags |= FLAG_OVERFLOW;
        // High-side truncation: keep the low `arr_size` bytes.
        let start = mag_len - arr_size;
        slot.copy_from_slice(&magnitude[start..]);
    } else if mag_len > 0 {
        slot[arr_size - mag_len..].copy_from_slice(&magnitude);
    }
    (slot, flags)
}

/// `bigint_binary_operators`: computes `op(left, right)` and returns the
/// result's magnitude plus the two-bit flag word.
pub fn binary_op(
    left: &[u8],
    left_neg: u32,
    right: &[u8],
    right_neg: u32,
    arr_size: usize,
    op: u32,
) -> Result<(Vec<u8>, u32), HostError> {
    if arr_size == 0 {
        return Err(HostError::ZeroArraySize);
    }
    let l = from_signed_magnitude(left, left_neg);
    let r = from_signed_magnitude(right, right_neg);
    let result = match op {
        OP_ADD => l + r,
        OP_SUB => l - r,
        OP_MUL => l * r,
        // Truncated-towards-zero, remainder takes the dividend's sign —
        // this crate's resolution of the DIV/MOD rounding open question
        // (see DESIGN.md), deliberately diverging from the Euclidean-flavored
        // division the original Go `math/big` performs.
        OP_DIV => l / r,
        OP_MOD => l % r,
        OP_AND => l & r,
        OP_OR => l | r,
        OP_XOR => l ^ r,
        _ => BigInt::from(0),
    };
    Ok(write_signed_magnitude(&result, arr_size))
}

/// `bigint_cmp`: three-way comparison, honoring sign flags.
pub fn cmp(left: &[u8], left_neg: u32, right: &[u8], right_neg: u32) -> i32 {
    let l = from_signed_magnitude(left, left_neg);
    let r = from_signed_magnitude(right, right_neg);
    match l.cmp(&r) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// `bigint_sh`: shifts the *magnitude* left or right by `n` and reattaches
/// the original sign flag unconditionally.
///
/// This is deliberately a magnitude-only shift rather than a full signed
/// two's-complement arithmetic shift: floor-dividing a negative signed
/// value by `2^n` in true two's-complement arithmetic asymptotically
/// approaches `-1` as `n` grows (it never reaches a zero magnitude), which
/// would contradict the documented property that `RIGHT` is "floored
/// division by `2^n` on the magnitude (sign preserved)" and the documented
/// `n >= bitlen` behavior of a zero magnitude with the negative flag still
/// set — see DESIGN.md for this open-question resolution.
pub fn shift(
    origin: &[u8],
    origin_neg: u32,
    n: u32,
    arr_size: usize,
    direction: u32,
) -> Result<(Vec<u8>, u32), HostError> {
    if arr_size == 0 {
        return Err(HostError::ZeroArraySize);
    }
    let magnitude = BigUint::from_bytes_be(origin);
    let shifted = if direction == DIRECTION_LEFT {
        magnitude << n as usize
    } else {
        magnitude >> n as usize
    };
    let mut bytes = shifted.to_bytes_be();
    if shifted == BigUint::from(0u8) {
        bytes.clear();
    }
    let mut slot = vec![0u8; arr_size];
    let mut flags = if origin_neg != 0 { FLAG_NEGATIVE } else { 0 };
    let mag_len = bytes.len();
    if mag_len > arr_size {
        flags |= FLAG_OVERFLOW;
        let start = mag_len - arr_size;
        slot.copy_from_slice(&bytes[start..]);
    } else if mag_len > 0 {
        slot[arr_size - mag_len..].copy_from_slice(&bytes);
    }
    Ok((slot, flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn be(val: u32, width: usize) -> Vec<u8> {
        let full = val.to_be_bytes();
        full[4 - width..].to_vec()
    }

    #[test]
    fn add_fits_exactly_in_arr_size_with_no_overflow_flag() {
        // 0x7fffffff + 2 == 0x80000001, which is exactly 4 bytes — the high
        // byte isn't dropped, it's just the sign-bit-looking top byte of an
        // unsigned magnitude that still fits. Matches vm.go's
        // `len(bytesResult) > int(arrSize)` check, which is false here too.
        let left = be(0x7fffffff, 4);
        let right = be(0x00000002, 4);
        let (bytes, flags) = binary_op(&left, 0, &right, 0, 4, OP_ADD).unwrap();
        assert_eq!(bytes, vec![0x80, 0x00, 0x00, 0x01]);
        assert_eq!(flags, 0);
    }

    #[test]
    fn sub_producing_negative_sets_negative_flag() {
        let left = be(3, 4);
        let right = be(5, 4);
        let (bytes, flags) = binary_op(&left, 0, &right, 0, 4, OP_SUB).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x02]);
        assert_eq!(flags, FLAG_NEGATIVE);
    }

    #[test]
    fn mul_of_non_negatives_has_zero_flag_when_it_fits() {
        let left = be(6, 4);
        let right = be(7, 4);
        let (bytes, flags) = binary_op(&left, 0, &right, 0, 4, OP_MUL).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 42]);
        assert_eq!(flags, 0);
    }

    #[test]
    fn div_truncates_towards_zero_for_mixed_signs() {
        // -7 / 2 == -3 (truncated), remainder -1 (sign of dividend).
        let left = be(7, 4);
        let right = be(2, 4);
        let (div_bytes, div_flags) = binary_op(&left, 1, &right, 0, 4, OP_DIV).unwrap();
        assert_eq!(div_bytes, vec![0, 0, 0, 3]);
        assert_eq!(div_flags, FLAG_NEGATIVE);

        let (mod_bytes, mod_flags) = binary_op(&left, 1, &right, 0, 4, OP_MOD).unwrap();
        assert_eq!(mod_bytes, vec![0, 0, 0, 1]);
        assert_eq!(mod_flags, FLAG_NEGATIVE);
    }

    #[test]
    fn bitwise_and_matches_two_complement_semantics() {
        // -1 AND x == x, for an infinite two's-complement -1.
        let minus_one = be(1, 4);
        let x = be(0x1234, 4);
        let (bytes, flags) = binary_op(&minus_one, 1, &x, 0, 4, OP_AND).unwrap();
        assert_eq!(bytes, x);
        assert_eq!(flags, 0);
    }

    #[test]
    fn cmp_is_antisymmetric_on_sign_negation() {
        let a = be(5, 4);
        let b = be(3, 4);
        assert_eq!(cmp(&a, 0, &b, 0), 1);
        assert_eq!(cmp(&a, 1, &b, 0), -1);
        assert_eq!(cmp(&a, 0, &b, 1), 1);
    }

    #[test]
    fn cmp_totality_and_zero_equality() {
        let zero = be(0, 4);
        assert_eq!(cmp(&zero, 0, &zero, 1), 0);
    }

    #[test]
    fn shift_left_is_multiplication_by_power_of_two() {
        let one = be(1, 4);
        let (bytes, flags) = shift(&one, 0, 3, 4, DIRECTION_LEFT).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 8]);
        assert_eq!(flags, 0);
    }

    #[test]
    fn shift_right_floors_the_magnitude_and_keeps_sign() {
        let seven = be(7, 4);
        let (bytes, flags) = shift(&seven, 1, 1, 4, DIRECTION_RIGHT).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 3]);
        assert_eq!(flags, FLAG_NEGATIVE);
    }

    #[test]
    fn shift_right_past_bitlen_yields_zero_magnitude_with_sign_preserved() {
        let seven = be(7, 4);
        let (bytes, flags) = shift(&seven, 1, 64, 4, DIRECTION_RIGHT).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert_eq!(flags, FLAG_NEGATIVE);
    }

    #[test]
    fn zero_arr_size_is_rejected() {
        let one = be(1, 4);
        assert_eq!(
            binary_op(&one, 0, &one, 0, 0, OP_ADD),
            Err(HostError::ZeroArraySize)
        );
    }
}
