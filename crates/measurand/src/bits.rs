//! Low-level bit manipulation on native 64-bit registers.
//!
//! Bits are numbered from the least significant end: bit 0 is the `1` bit of a word.

/// Width of the native register every word is held in.
pub const REGISTER_BITS: u32 = u64::BITS;

/// Returns a value with the low `n` bits set. `n` may be 0..=64.
pub fn low_mask(n: u32) -> u64 {
    if n >= REGISTER_BITS {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Derives `(mask, shift)` selecting the inclusive bit range `lo..=hi` (0-based).
/// The range may be given in either order.
pub fn mask_and_shift(lo: u32, hi: u32) -> (u64, u32) {
    let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
    (low_mask(hi - lo + 1) << lo, lo)
}

/// Reverses the low `n` bits of `x` (bit 0 becomes bit `n - 1`).
///
/// The whole register is mirrored, then the high-order padding that moved
/// down from above bit `n` is shifted out.
pub fn reverse_bits_n(x: u64, n: u32) -> u64 {
    if n == 0 {
        return 0;
    }

    x.reverse_bits() >> (REGISTER_BITS - n)
}

/// Sign-extends the low `bits` of `value` to a full `i64`. Zero bits give 0 and
/// widths of 64 or more reinterpret the whole register.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    match bits {
        0 => 0,
        _ if bits >= REGISTER_BITS => value as i64,
        _ => {
            let shift = REGISTER_BITS - bits;
            ((value << shift) as i64) >> shift
        }
    }
}

/// Returns true when the sign bit (bit `bits - 1`, at most bit 63) of `value` is set.
pub fn sign_bit(value: u64, bits: u32) -> bool {
    bits > 0 && (value >> (bits.min(REGISTER_BITS) - 1)) & 1 == 1
}

/// Computes `m * 2^e`, splitting the scale so intermediate powers never overflow.
pub fn ldexp(m: f64, e: i32) -> f64 {
    const STEP: i32 = 1000;

    if e > STEP {
        m * 2f64.powi(STEP) * 2f64.powi(e - STEP)
    } else if e < -STEP {
        m * 2f64.powi(-STEP) * 2f64.powi(e + STEP)
    } else {
        m * 2f64.powi(e)
    }
}
