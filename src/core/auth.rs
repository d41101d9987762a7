//! PIN verification
//!
//! The ledger stores PINs in plaintext. [`PinVerifier`] compares them in
//! constant time so the comparison itself does not leak how many leading
//! characters matched.

use crate::core::traits::SecretVerifier;
use subtle::ConstantTimeEq;

/// Plaintext PIN comparison
#[derive(Debug, Clone, Copy, Default)]
pub struct PinVerifier;

impl SecretVerifier for PinVerifier {
    fn verify(&self, stored: &str, presented: &str) -> bool {
        // ct_eq on slices of different lengths is false without inspecting contents
        stored.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact("1234", "1234", true)]
    #[case::wrong_digit("1234", "1235", false)]
    #[case::prefix("1234", "123", false)]
    #[case::longer("1234", "12345", false)]
    #[case::empty_presented("1234", "", false)]
    #[case::whitespace_is_significant("1234", "1234 ", false)]
    fn test_verify(#[case] stored: &str, #[case] presented: &str, #[case] expected: bool) {
        assert_eq!(PinVerifier.verify(stored, presented), expected);
    }
}
