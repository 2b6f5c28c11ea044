//! Property-based tests across the primitives.
//!
//! - AES-GCM round-trips and rejects any single-bit modification
//! - ECIES round-trips for arbitrary payloads
//! - ECDSA output is a function of (key, data) and changes with the key
//! - MGF1 output for a shorter length is a prefix of a longer one
//! - The DER reader never panics on arbitrary input

use proptest::prelude::*;

use crate::backend::RustCryptoBackend;
use crate::cert::Asn1Node;
use crate::config::{AeadConfig, EciesConfig};
use crate::crypto::aead::AeadCipher;
use crate::crypto::ecdsa::DeterministicSigner;
use crate::crypto::ecies::HybridEncryption;
use crate::crypto::mgf1::mgf1_sha256;
use crate::error::CryptoError;

use elliptic_curve::SecretKey;
use p256::NistP256;

fn aes_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 24),
        prop::collection::vec(any::<u8>(), 32),
    ]
}

fn aead_config() -> impl Strategy<Value = AeadConfig> {
    (prop_oneof![Just(12usize), Just(16usize)], 12usize..=16)
        .prop_map(|(iv_size, tag_size)| AeadConfig { iv_size, tag_size })
}

// ==================== AES-GCM ====================

proptest! {
    #[test]
    fn aead_round_trip(
        key in aes_key(),
        config in aead_config(),
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let cipher = AeadCipher::new(config).unwrap();
        let blob = cipher.encrypt(&key, &plaintext).unwrap();
        prop_assert_eq!(blob.len(), config.iv_size + plaintext.len() + config.tag_size);
        prop_assert_eq!(cipher.decrypt(&key, &blob).unwrap(), plaintext);
    }

    #[test]
    fn aead_detects_single_bit_flips(
        key in aes_key(),
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let cipher = AeadCipher::new(AeadConfig::default()).unwrap();
        let mut blob = cipher.encrypt(&key, &plaintext).unwrap();
        let i = position.index(blob.len());
        blob[i] ^= 1 << bit;
        prop_assert_eq!(cipher.decrypt(&key, &blob), Err(CryptoError::Authentication));
    }
}

// ==================== ECIES / ECDSA ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ecies_round_trip(
        scalar in prop::array::uniform32(1u8..0x7F),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let recipient = SecretKey::<NistP256>::from_slice(&scalar).unwrap();
        let ecies = HybridEncryption::<NistP256>::new(EciesConfig::default()).unwrap();
        let envelope = ecies.encrypt(&recipient.public_key(), &plaintext).unwrap();
        prop_assert_eq!(envelope.len(), ecies.header_len() + plaintext.len() + 16);
        prop_assert_eq!(ecies.decrypt(&recipient, &envelope).unwrap(), plaintext);
    }

    #[test]
    fn ecdsa_is_deterministic(
        scalar in prop::array::uniform32(1u8..0x7F),
        data in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let signer = DeterministicSigner::<NistP256>::default();
        let a = signer.sign_raw(&scalar, &data).unwrap();
        let b = signer.sign_raw(&scalar, &data).unwrap();
        prop_assert_eq!(a.len(), 64);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn ecdsa_depends_on_the_key(
        scalar in prop::array::uniform32(1u8..0x7F),
        delta in 1u8..0x7F,
        data in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut other = scalar;
        other[31] = other[31].wrapping_add(delta);
        let signer = DeterministicSigner::<NistP256>::default();
        let a = signer.sign_raw(&scalar, &data).unwrap();
        let b = signer.sign_raw(&other, &data).unwrap();
        prop_assert_ne!(a, b);
    }
}

// ==================== MGF1 / ASN.1 ====================

proptest! {
    #[test]
    fn mgf1_prefix_property(
        seed in prop::collection::vec(any::<u8>(), 0..64),
        short in 0usize..100,
        extra in 0usize..100,
    ) {
        let long = mgf1_sha256(&seed, short + extra);
        let prefix = mgf1_sha256(&seed, short);
        prop_assert_eq!(long.len(), short + extra);
        prop_assert_eq!(&long[..short], prefix.as_slice());
    }

    #[test]
    fn asn1_parser_never_panics(der in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = Asn1Node::parse(&der);
    }
}

#[test]
fn default_backend_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RustCryptoBackend>();
    assert_send_sync::<AeadCipher>();
    assert_send_sync::<HybridEncryption>();
    assert_send_sync::<DeterministicSigner>();
    assert_send_sync::<crate::crypto::pss::PssSigner>();
}
