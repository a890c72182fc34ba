//! Integer avalanche mixing.
//!
//! Bucket selection runs `key.mix() % capacity`, so consecutive or
//! stride-patterned keys must land on well-scattered hash values. The
//! finalizers below are fixed multiply/XOR/shift sequences over two odd
//! constants; both are bijections on their input width, and flipping one
//! input bit flips about half of the output bits. Mixing is never used for
//! equality; keys compare with `Eq`.

/// Keys usable by the table: an equality-comparable type with a fixed,
/// deterministic mixing function. Implemented for the primitive integers.
pub trait MixHash {
    /// Mix the key into a full-width hash. Pure and total.
    fn mix(&self) -> u64;
}

/// 32-bit finalizer: shifts 16/13/16 against `0x85ebca6b` / `0xc2b2ae35`.
#[inline]
#[must_use]
pub fn mix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x85eb_ca6b);
    x ^= x >> 13;
    x = x.wrapping_mul(0xc2b2_ae35);
    x ^= x >> 16;
    x
}

/// 64-bit finalizer: shifts 33/33/33 against `0xff51afd7ed558ccd` /
/// `0xc4ceb9fe1a85ec53`.
#[inline]
#[must_use]
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x
}

// Signed types go through their unsigned bit pattern, not sign extension,
// so -1i32 and 0xffff_ffffu32 mix identically on both widths.

macro_rules! impl_mix32 {
    ($($t:ty => $u:ty),* $(,)?) => {$(
        impl MixHash for $t {
            #[inline]
            fn mix(&self) -> u64 {
                mix32(<$u>::from_ne_bytes(self.to_ne_bytes()) as u32) as u64
            }
        }
    )*};
}

macro_rules! impl_mix64 {
    ($($t:ty),* $(,)?) => {$(
        impl MixHash for $t {
            #[inline]
            fn mix(&self) -> u64 {
                mix64(*self as u64)
            }
        }
    )*};
}

impl_mix32!(u8 => u8, i8 => u8, u16 => u16, i16 => u16, u32 => u32, i32 => u32);
impl_mix64!(u64, i64, usize, isize);
