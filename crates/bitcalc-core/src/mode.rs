//! Word sizes and two's-complement wraparound.
//!
//! A [`Mode`] fixes the width every result is reduced to. All arithmetic is
//! done on [`BigInt`] so the 64-bit mode never loses precision.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width `<<` and `>>` operate in, whatever the mode.
pub const SHIFT_WIDTH: u32 = 32;

/// Fixed integer width used for wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// 16-bit
    #[default]
    Word,
    /// 32-bit
    Dword,
    /// 64-bit
    Qword,
}

impl Mode {
    /// All modes, narrowest first.
    pub const fn all() -> &'static [Self] {
        &[Self::Word, Self::Dword, Self::Qword]
    }

    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Word => 16,
            Self::Dword => 32,
            Self::Qword => 64,
        }
    }

    /// Upper-case mode name as shown to users and stored in history.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Word => "WORD",
            Self::Dword => "DWORD",
            Self::Qword => "QWORD",
        }
    }

    /// `2^bits`.
    pub fn modulus(self) -> BigInt {
        BigInt::one() << self.bits()
    }

    /// Largest representable signed value, `2^(bits-1) - 1`.
    pub fn max_signed(self) -> BigInt {
        (BigInt::one() << (self.bits() - 1)) - 1
    }

    /// Smallest representable signed value, `-2^(bits-1)`.
    pub fn min_signed(self) -> BigInt {
        -(BigInt::one() << (self.bits() - 1))
    }

    /// Whether `value` lies in the signed range of this mode.
    pub fn contains(self, value: &BigInt) -> bool {
        *value >= self.min_signed() && *value <= self.max_signed()
    }

    /// Reduce an unbounded integer into this mode's range.
    pub fn wrap(self, raw: &BigInt) -> Wrapped {
        let modulus = self.modulus();
        let wrapped = ((raw % &modulus) + &modulus) % &modulus;
        let signed = if wrapped > self.max_signed() {
            &wrapped - &modulus
        } else {
            wrapped
        };
        let unsigned = (&signed + &modulus) % &modulus;
        Wrapped { signed, unsigned }
    }

    /// Signed view of an unsigned bit pattern under this mode.
    ///
    /// Bits above the mode's width are discarded first.
    pub fn reinterpret(self, unsigned: &BigInt) -> BigInt {
        self.wrap(unsigned).signed
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}' (expected WORD, DWORD or QWORD)")]
pub struct ModeParseError(pub String);

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WORD" => Ok(Self::Word),
            "DWORD" => Ok(Self::Dword),
            "QWORD" => Ok(Self::Qword),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

/// A value after wraparound, in both interpretations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// Two's-complement signed value
    pub signed: BigInt,
    /// Same bits read as unsigned
    pub unsigned: BigInt,
}

/// Reduce `raw` to a signed integer of `bits` width.
///
/// Used for shift operands, which live in a width that can differ from the
/// active mode.
pub fn wrap_signed(raw: &BigInt, bits: u32) -> BigInt {
    let modulus = BigInt::one() << bits;
    let half = BigInt::one() << (bits - 1);
    let mut wrapped = raw % &modulus;
    if wrapped < BigInt::zero() {
        wrapped += &modulus;
    }
    if wrapped >= half {
        wrapped - modulus
    } else {
        wrapped
    }
}
