//! Mixed-radix conversion between a payload integer and move indices.
//!
//! Encoding peels one digit per step with `V mod r`, `V div r`, where `r` is
//! that step's candidate count. Decoding collects the `(radix, digit)` pairs
//! in play order and folds them back-to-front with `V * r + d`, so the last
//! step is the most significant digit.

mod bigint;
mod framing;

pub use bigint::PayloadInteger;
pub use framing::{Framing, HEADER_LEN, TERMINATOR};

use crate::error::StegoError;

/// One emitted digit and the radix it was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit {
    pub radix: u32,
    pub value: u32,
}

/// Encoder side: owns the payload integer for the duration of one walk.
#[derive(Debug)]
pub struct DigitExtractor {
    value: PayloadInteger,
    emitted: usize,
}

impl DigitExtractor {
    pub fn new(value: PayloadInteger) -> Self {
        Self { value, emitted: 0 }
    }

    /// Frame `payload` and start extracting.
    pub fn from_payload(payload: &[u8], framing: Framing) -> Result<Self, StegoError> {
        Ok(Self::new(framing.pack(payload)?))
    }

    /// True once every significant digit has been emitted.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.value.is_zero()
    }

    #[inline]
    pub fn remaining_bits(&self) -> u64 {
        self.value.bits()
    }

    #[inline]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Take the next digit in base `radix`.
    ///
    /// Radices below 2 carry no information and are rejected.
    pub fn next_digit(&mut self, radix: usize, ply: usize) -> Result<Digit, StegoError> {
        let r = u32::try_from(radix)
            .ok()
            .filter(|&r| r >= 2)
            .ok_or(StegoError::RadixTooSmall { ply, radix })?;
        let value = self.value.div_rem_small(r);
        self.emitted += 1;
        Ok(Digit { radix: r, value })
    }
}

/// Decoder side: gathers digits in play order, folds them at the end.
#[derive(Debug, Default)]
pub struct DigitCollector {
    digits: Vec<Digit>,
}

impl DigitCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the digit `index` observed at a step of radix `radix`.
    pub fn push(&mut self, radix: usize, index: usize, ply: usize) -> Result<(), StegoError> {
        let r = u32::try_from(radix)
            .ok()
            .filter(|&r| r >= 2)
            .ok_or(StegoError::RadixTooSmall { ply, radix })?;
        debug_assert!(index < radix);
        self.digits.push(Digit {
            radix: r,
            value: index as u32,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Fold back-to-front into the payload integer.
    pub fn finish(self) -> PayloadInteger {
        let mut value = PayloadInteger::zero();
        for d in self.digits.iter().rev() {
            value.mul_add_small(d.radix, d.value);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_then_collect() {
        let payload = b"Steganography is awesome !";
        let mut ex = DigitExtractor::from_payload(payload, Framing::Bare).unwrap();
        let mut col = DigitCollector::new();
        let radices = [20usize, 20, 22, 19, 30, 27, 2, 5];
        let mut ply = 0;
        while !ex.is_exhausted() {
            let r = radices[ply % radices.len()];
            let d = ex.next_digit(r, ply).unwrap();
            assert!(d.value < d.radix);
            col.push(r, d.value as usize, ply).unwrap();
            ply += 1;
        }
        assert_eq!(ex.emitted(), col.len());
        assert_eq!(Framing::Bare.unpack(&col.finish()).unwrap(), payload);
    }

    #[test]
    fn test_first_digit_is_least_significant() {
        let mut ex = DigitExtractor::new(PayloadInteger::from_u64(47));
        assert_eq!(ex.next_digit(20, 0).unwrap().value, 7);
        assert_eq!(ex.next_digit(20, 1).unwrap().value, 2);
        assert!(ex.is_exhausted());
    }

    #[test]
    fn test_radix_floor() {
        let mut ex = DigitExtractor::new(PayloadInteger::from_u64(5));
        assert!(matches!(
            ex.next_digit(1, 3),
            Err(StegoError::RadixTooSmall { ply: 3, radix: 1 })
        ));
        assert!(matches!(
            ex.next_digit(0, 4),
            Err(StegoError::RadixTooSmall { ply: 4, radix: 0 })
        ));
        assert_eq!(ex.remaining_bits(), 3);

        let mut col = DigitCollector::new();
        assert!(col.push(1, 0, 0).is_err());
        assert!(col.is_empty());
    }

    #[test]
    fn test_empty_collection_is_zero() {
        assert!(DigitCollector::new().finish().is_zero());
    }
}
