//! # Accumulator Membership Verification
//!
//! RSA-style accumulator check: a value `x` is a claimed member of the
//! accumulator `acc` if `witness^x ≡ acc (mod N)` for the fixed public
//! modulus `N`. The modulus is produced by the external accumulator
//! construction library; this module carries its published value and the
//! verification arithmetic only. Witness generation and accumulator
//! updates happen outside this processor.
//!
//! Verification failure is a normal boolean `false`, never an error: the
//! arithmetic is total over non-negative inputs (including a zero witness
//! or exponent, which simply yields a non-matching result).

use malachite::num::arithmetic::traits::{Mod, ModPow};
use malachite::Natural;
use std::str::FromStr;

/// Public 2048-bit accumulator modulus, as published by the accumulator
/// construction library. Decimal digits, most significant first.
const PUBLIC_MODULUS_DECIMAL: &str = concat!(
    "230252468340294589474793041842857014294948607673694007453249846284829280",
    "756728525961846171745267755481503837620577369226981363237947890751568633",
    "879824038780921847209047990832503684527137738297985622361843942825632941",
    "780808468239694175989416675598605820881090731038478142926444815403342154",
    "820320951727154271552765396419670786649001362737553032214973241629751858",
    "469420149274982340927545168462636583260896013612988918794245342509940115",
    "791918083154015221210197356012354404506905291309000700429382148063077868",
    "972223660611856437961200722987001559779216620354800734995966762899668466",
    "04967848959087985228266605284484729381699",
);

/// Returns the fixed public accumulator modulus.
///
/// The decimal constant above is validated at test time; parsing it
/// cannot fail at runtime.
pub fn public_modulus() -> Natural {
    Natural::from_str(PUBLIC_MODULUS_DECIMAL)
        .expect("public modulus constant is a valid decimal integer")
}

/// Checks whether `witness` proves membership of `exponent` in the
/// accumulator value `acc_value`, i.e. whether
/// `witness^exponent ≡ acc_value (mod modulus)`.
///
/// Both sides are reduced modulo `modulus` before comparison, so callers
/// may pass unreduced values. `modulus` must be non-zero; the fixed
/// public modulus always is.
pub fn verify_membership(
    witness: &Natural,
    exponent: &Natural,
    modulus: &Natural,
    acc_value: &Natural,
) -> bool {
    let base = witness.mod_op(modulus);
    let lhs = base.mod_pow(exponent, modulus);
    lhs == acc_value.mod_op(modulus)
}
