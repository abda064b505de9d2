//! Signed decimal and grouped unsigned hex/octal/binary rendering.

use crate::mode::Mode;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Output base for unsigned rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    /// Base 2, `0b`, groups of 4
    Binary,
    /// Base 8, `0o`, groups of 3
    Octal,
    /// Base 16, `0x`, groups of 4, upper case
    Hex,
}

impl Radix {
    /// Numeric base.
    pub const fn base(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Hex => 16,
        }
    }

    /// Digits per space-separated group.
    pub const fn group(self) -> usize {
        match self {
            Self::Binary | Self::Hex => 4,
            Self::Octal => 3,
        }
    }

    /// Literal prefix.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Binary => "0b",
            Self::Octal => "0o",
            Self::Hex => "0x",
        }
    }

    /// Minimum digit count for a value of `mode` width.
    ///
    /// Binary and hex cover the whole word; octal only pads to its group.
    pub const fn width_digits(self, mode: Mode) -> usize {
        match self {
            Self::Binary => mode.bits() as usize,
            Self::Hex => mode.bits() as usize / 4,
            Self::Octal => 0,
        }
    }
}

/// Render a non-negative value in `radix`, zero-padded and grouped.
///
/// The natural digit string is padded to at least `min_digits`, then up to a
/// multiple of the group size, and a space is inserted between groups.
pub fn format_grouped(value: &BigInt, radix: Radix, min_digits: usize) -> String {
    let mut digits = value.to_str_radix(radix.base());
    if radix == Radix::Hex {
        digits.make_ascii_uppercase();
    }

    let group = radix.group();
    let mut len = digits.len().max(min_digits);
    if len % group != 0 {
        len += group - len % group;
    }
    let padded = format!("{digits:0>len$}");

    let mut out = String::with_capacity(radix.prefix().len() + len + len / group);
    out.push_str(radix.prefix());
    for (i, c) in padded.chars().enumerate() {
        if i > 0 && i % group == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Outcome of a successful evaluation: one wrapped value, four renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Mode the value was wrapped under
    pub mode: Mode,
    /// Two's-complement signed value in decimal
    pub signed_decimal: String,
    /// `0x`-prefixed, grouped, upper case
    pub hex: String,
    /// `0o`-prefixed, grouped
    pub octal: String,
    /// `0b`-prefixed, grouped
    pub binary: String,
    unsigned: BigInt,
}

impl CalculationResult {
    /// Wrap an unbounded integer under `mode` and render it.
    pub fn from_raw(raw: &BigInt, mode: Mode) -> Self {
        let wrapped = mode.wrap(raw);
        Self {
            mode,
            signed_decimal: wrapped.signed.to_string(),
            hex: format_grouped(&wrapped.unsigned, Radix::Hex, Radix::Hex.width_digits(mode)),
            octal: format_grouped(&wrapped.unsigned, Radix::Octal, 0),
            binary: format_grouped(
                &wrapped.unsigned,
                Radix::Binary,
                Radix::Binary.width_digits(mode),
            ),
            unsigned: wrapped.unsigned,
        }
    }

    /// The wrapped bit pattern, read as unsigned.
    pub const fn unsigned(&self) -> &BigInt {
        &self.unsigned
    }

    /// Same bits rendered under another mode.
    ///
    /// Bits above the target width are dropped; the signed decimal follows the
    /// target modulus.
    pub fn reinterpret(&self, mode: Mode) -> Self {
        Self::from_raw(&self.unsigned, mode)
    }

    /// Rendering for `radix`.
    pub fn in_radix(&self, radix: Radix) -> &str {
        match radix {
            Radix::Binary => &self.binary,
            Radix::Octal => &self.octal,
            Radix::Hex => &self.hex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_word_ten() {
        let r = CalculationResult::from_raw(&BigInt::from(10), Mode::Word);
        assert_eq!(r.signed_decimal, "10");
        assert_eq!(r.binary, "0b0000 0000 0000 1010");
        assert_eq!(r.hex, "0x000A");
        assert_eq!(r.octal, "0o012");
    }

    #[test]
    fn test_word_minus_one() {
        let r = CalculationResult::from_raw(&BigInt::from(-1), Mode::Word);
        assert_eq!(r.signed_decimal, "-1");
        assert_eq!(r.hex, "0xFFFF");
        assert_eq!(r.octal, "0o177 777");
        assert_eq!(r.binary, "0b1111 1111 1111 1111");
    }

    #[test]
    fn test_zero() {
        let r = CalculationResult::from_raw(&BigInt::from(0), Mode::Dword);
        assert_eq!(r.hex, "0x0000 0000");
        assert_eq!(r.octal, "0o000");
        assert_eq!(r.binary.len(), 2 + 32 + 7);
    }

    #[test]
    fn test_qword_min() {
        let raw = BigInt::from(i64::MAX) + 1;
        let r = CalculationResult::from_raw(&raw, Mode::Qword);
        assert_eq!(r.signed_decimal, "-9223372036854775808");
        assert_eq!(r.hex, "0x8000 0000 0000 0000");
        assert_eq!(r.octal, "0o001 000 000 000 000 000 000 000");
    }

    #[test]
    fn test_hex_upper_case() {
        let r = CalculationResult::from_raw(&BigInt::from(0xBEEF), Mode::Dword);
        assert_eq!(r.hex, "0x0000 BEEF");
    }

    #[test]
    fn test_reinterpret_keeps_bits() {
        let r = CalculationResult::from_raw(&BigInt::from(-1), Mode::Word);
        let wide = r.reinterpret(Mode::Dword);
        assert_eq!(wide.signed_decimal, "65535");
        assert_eq!(wide.unsigned(), r.unsigned());
        assert_eq!(wide.octal, r.octal);
        assert_eq!(wide.hex, "0x0000 FFFF");
    }

    #[test]
    fn test_in_radix() {
        let r = CalculationResult::from_raw(&BigInt::from(5), Mode::Word);
        assert_eq!(r.in_radix(Radix::Hex), "0x0005");
        assert_eq!(r.in_radix(Radix::Octal), "0o005");
    }

    #[test]
    fn test_format_grouped_natural() {
        assert_eq!(format_grouped(&BigInt::from(255), Radix::Hex, 0), "0x00FF");
        assert_eq!(format_grouped(&BigInt::from(8), Radix::Octal, 0), "0o010");
        assert_eq!(format_grouped(&BigInt::from(5), Radix::Binary, 0), "0b0101");
    }

    proptest! {
        #[test]
        fn prop_grouping_is_uniform(v in any::<u64>(), mode_idx in 0usize..3) {
            let mode = Mode::all()[mode_idx];
            let r = CalculationResult::from_raw(&BigInt::from(v), mode);
            for radix in [Radix::Binary, Radix::Octal, Radix::Hex] {
                let body = &r.in_radix(radix)[2..];
                for group in body.split(' ') {
                    prop_assert_eq!(group.len(), radix.group());
                }
                let digits: String = body.chars().filter(|c| *c != ' ').collect();
                let parsed = BigInt::parse_bytes(digits.as_bytes(), radix.base()).unwrap();
                prop_assert_eq!(&parsed, r.unsigned());
            }
        }

        #[test]
        fn prop_formatting_is_deterministic(v in any::<i64>()) {
            let a = CalculationResult::from_raw(&BigInt::from(v), Mode::Qword);
            let b = CalculationResult::from_raw(&BigInt::from(v), Mode::Qword);
            prop_assert_eq!(a, b);
        }
    }
}
