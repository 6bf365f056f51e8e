//! Bit layouts of the floating-point formats a record can be decoded as.
//!
//! Every function takes the composed record, most significant bit first, and
//! returns its value as `f64`. Layouts are written as bit positions of that
//! composed value (bit 0 is the least significant bit).

use crate::bits::{ldexp, low_mask, sign_extend};

/// IEEE 754 binary16: sign 15, exponent 14..10 (bias 15), fraction 9..0.
pub fn ieee16(raw: u64) -> f64 {
    let sign = if (raw >> 15) & 1 == 1 { -1.0 } else { 1.0 };
    let exponent = ((raw >> 10) & 0x1F) as i32;
    let fraction = (raw & 0x3FF) as f64;

    match exponent {
        0 => sign * ldexp(fraction, -24),
        0x1F if fraction == 0.0 => sign * f64::INFINITY,
        0x1F => f64::NAN,
        _ => sign * ldexp(1.0 + fraction / 1024.0, exponent - 15),
    }
}

pub fn ieee32(raw: u64) -> f64 {
    f32::from_bits(raw as u32) as f64
}

pub fn ieee64(raw: u64) -> f64 {
    f64::from_bits(raw)
}

/// MIL-STD-1750A single precision: 24-bit two's-complement fraction in 31..8,
/// two's-complement exponent in 7..0.
pub fn milstd1750a32(raw: u64) -> f64 {
    let mantissa = sign_extend(raw >> 8, 24) as f64 / (1u64 << 23) as f64;
    let exponent = (raw & 0xFF) as u8 as i8;
    ldexp(mantissa, exponent.into())
}

/// MIL-STD-1750A extended precision: fraction MSW in 47..24, exponent in
/// 23..16, fraction extension in 15..0.
pub fn milstd1750a48(raw: u64) -> f64 {
    let bits = ((raw >> 24) & low_mask(24)) << 16 | (raw & low_mask(16));
    let mantissa = sign_extend(bits, 40) as f64 / (1u64 << 39) as f64;
    let exponent = ((raw >> 16) & 0xFF) as u8 as i8;
    ldexp(mantissa, exponent.into())
}

/// TI TMS320 floating point with `fraction_bits` fraction bits: exponent byte
/// above the sign bit, then the fraction. An exponent of -128 encodes zero.
fn ti(raw: u64, fraction_bits: u32) -> f64 {
    let exponent = (raw >> (fraction_bits + 1)) as u8 as i8;
    if exponent == i8::MIN {
        return 0.0;
    }

    let negative = (raw >> fraction_bits) & 1 == 1;
    let fraction = (raw & low_mask(fraction_bits)) as f64 / (1u64 << fraction_bits) as f64;
    let significand = if negative { -2.0 + fraction } else { 1.0 + fraction };
    ldexp(significand, exponent.into())
}

/// TI single precision: exponent 31..24, sign 23, fraction 22..0.
pub fn ti32(raw: u64) -> f64 {
    ti(raw & low_mask(32), 23)
}

/// TI extended precision: exponent 39..32, sign 31, fraction 30..0.
pub fn ti40(raw: u64) -> f64 {
    ti(raw & low_mask(40), 31)
}

/// IBM System/360 hexadecimal floating point: sign, 7-bit excess-64 base-16
/// exponent, then `fraction_bits` of fraction.
fn ibm(raw: u64, fraction_bits: u32) -> f64 {
    let negative = (raw >> (fraction_bits + 7)) & 1 == 1;
    let exponent = ((raw >> fraction_bits) & 0x7F) as i32 - 64;
    let fraction = (raw & low_mask(fraction_bits)) as f64;
    let value = ldexp(fraction, 4 * exponent - fraction_bits as i32);

    if negative { -value } else { value }
}

/// IBM single precision: sign 31, exponent 30..24, fraction 23..0.
pub fn ibm32(raw: u64) -> f64 {
    ibm(raw & low_mask(32), 24)
}

/// IBM double precision: sign 63, exponent 62..56, fraction 55..0.
pub fn ibm64(raw: u64) -> f64 {
    ibm(raw, 56)
}

/// DEC VAX floating point with a hidden `0.1` leading fraction bit. A zero
/// exponent is zero with the sign clear and a reserved operand otherwise.
fn dec(raw: u64, exponent_bits: u32, fraction_bits: u32) -> f64 {
    let negative = (raw >> (exponent_bits + fraction_bits)) & 1 == 1;
    let exponent = ((raw >> fraction_bits) & low_mask(exponent_bits)) as i32;

    if exponent == 0 {
        return if negative { f64::NAN } else { 0.0 };
    }

    let bias = 1i32 << (exponent_bits - 1);
    let fraction = (raw & low_mask(fraction_bits)) as f64;
    let significand = 0.5 + ldexp(fraction, -(fraction_bits as i32) - 1);
    let value = ldexp(significand, exponent - bias);

    if negative { -value } else { value }
}

/// VAX F_floating: sign 31, exponent 30..23 (bias 128), fraction 22..0.
pub fn dec32(raw: u64) -> f64 {
    dec(raw & low_mask(32), 8, 23)
}

/// VAX D_floating: sign 63, exponent 62..55 (bias 128), fraction 54..0.
pub fn dec64(raw: u64) -> f64 {
    dec(raw, 8, 55)
}

/// VAX G_floating: sign 63, exponent 62..52 (bias 1024), fraction 51..0.
pub fn dec64g(raw: u64) -> f64 {
    dec(raw, 11, 52)
}
