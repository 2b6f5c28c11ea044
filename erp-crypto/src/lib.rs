#![allow(clippy::doc_overindented_list_items)]

mod backend;
mod cert;
mod config;
mod constants;
mod crypto;
mod error;
mod types;

#[cfg(test)]
mod proptests;

pub use der::asn1::ObjectIdentifier;
pub use elliptic_curve::{PublicKey, SecretKey};
pub use p256::NistP256;
pub use p384::NistP384;

pub use self::backend::{CryptoBackend, RustCryptoBackend};
pub use self::cert::{Asn1Node, Certificate, Classification, EncryptionCertificate};
pub use self::config::{AeadConfig, EcdsaConfig, EciesConfig, SignatureEncoding};
pub use self::constants::{
    ADMISSION_OID, CERTIFICATE_POLICIES_OID, EC_PUBLIC_KEY_OID, ECIES_DEFAULT_INFO,
    ECIES_DEFAULT_VERSION, RSA_ENCRYPTION_OID,
};
pub use self::crypto::SignatureScheme;
pub use self::crypto::aead::AeadCipher;
pub use self::crypto::ecdsa::DeterministicSigner;
pub use self::crypto::ecies::HybridEncryption;
pub use self::crypto::mgf1::mgf1_sha256;
pub use self::crypto::pss::PssSigner;
pub use self::crypto::rsa::RsaKeyMaterial;
pub use self::error::{CryptoError, CryptoResult, ParseError};
pub use self::types::{KeyAlgorithm, NamedCurve, Oid};
