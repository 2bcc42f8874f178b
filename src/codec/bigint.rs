//! Arbitrary-precision non-negative integer.
//!
//! Only the operations the codec needs: build from bytes, divide by a small
//! radix with remainder, multiply by a small radix and add a digit, and dump
//! back to bytes.

use std::fmt;

/// Little-endian `u32` limbs with no trailing zero limbs.
///
/// Zero is the empty limb vector.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PayloadInteger {
    limbs: Vec<u32>,
}

impl PayloadInteger {
    pub fn zero() -> Self {
        Self { limbs: Vec::new() }
    }

    pub fn from_u64(value: u64) -> Self {
        let mut n = Self {
            limbs: vec![value as u32, (value >> 32) as u32],
        };
        n.normalize();
        n
    }

    /// Interpret `bytes` as a little-endian integer.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut limbs = Vec::with_capacity(bytes.len().div_ceil(4));
        for chunk in bytes.chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            limbs.push(u32::from_le_bytes(word));
        }
        let mut n = Self { limbs };
        n.normalize();
        n
    }

    /// Minimal little-endian bytes (empty for zero).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = self.limbs.iter().flat_map(|l| l.to_le_bytes()).collect();
        while out.last() == Some(&0) {
            out.pop();
        }
        out
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u64 {
        match self.limbs.last() {
            None => 0,
            Some(top) => {
                (self.limbs.len() as u64 - 1) * 32 + (32 - top.leading_zeros() as u64)
            }
        }
    }

    /// `self = self / divisor`, returning `self % divisor`.
    ///
    /// `divisor` must be non-zero.
    pub fn div_rem_small(&mut self, divisor: u32) -> u32 {
        debug_assert!(divisor != 0);
        let d = divisor as u64;
        let mut rem = 0u64;
        for limb in self.limbs.iter_mut().rev() {
            let cur = (rem << 32) | *limb as u64;
            *limb = (cur / d) as u32;
            rem = cur % d;
        }
        self.normalize();
        rem as u32
    }

    /// `self = self * factor + addend`.
    pub fn mul_add_small(&mut self, factor: u32, addend: u32) {
        let mut carry = addend as u64;
        for limb in self.limbs.iter_mut() {
            let cur = *limb as u64 * factor as u64 + carry;
            *limb = cur as u32;
            carry = cur >> 32;
        }
        if carry != 0 {
            self.limbs.push(carry as u32);
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }
}

impl fmt::Debug for PayloadInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadInteger(0x")?;
        if self.limbs.is_empty() {
            write!(f, "0")?;
        }
        for (i, limb) in self.limbs.iter().rev().enumerate() {
            if i == 0 {
                write!(f, "{limb:x}")?;
            } else {
                write!(f, "{limb:08x}")?;
            }
        }
        write!(f, ")")
    }
}
