/*!
    Parameter sets for the cipher and signer components.

    Each set is fixed when a component is constructed. They derive serde so
    that higher layers can keep them in JSON or YAML next to their other
    settings; omitted fields fall back to the defaults below.
*/

use serde::{Deserialize, Serialize};

use crate::backend::{SUPPORTED_IV_SIZES, SUPPORTED_TAG_SIZES};
use crate::constants::{
    DEFAULT_IV_SIZE, DEFAULT_TAG_SIZE, ECIES_DEFAULT_AES_KEY_SIZE, ECIES_DEFAULT_INFO,
    ECIES_DEFAULT_VERSION,
};
use crate::error::{CryptoError, CryptoResult};

/**
    AES-GCM framing parameters. Defaults: 12-byte IV, 16-byte tag.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeadConfig {
    pub iv_size: usize,
    pub tag_size: usize,
}

impl Default for AeadConfig {
    fn default() -> Self {
        Self {
            iv_size: DEFAULT_IV_SIZE,
            tag_size: DEFAULT_TAG_SIZE,
        }
    }
}

impl AeadConfig {
    pub fn validate(&self) -> CryptoResult<()> {
        if !SUPPORTED_IV_SIZES.contains(&self.iv_size) {
            return Err(CryptoError::UnsupportedParameter(format!(
                "IV size must be one of {SUPPORTED_IV_SIZES:?}, got {}",
                self.iv_size
            )));
        }
        if !SUPPORTED_TAG_SIZES.contains(&self.tag_size) {
            return Err(CryptoError::UnsupportedParameter(format!(
                "tag size must be within {SUPPORTED_TAG_SIZES:?}, got {}",
                self.tag_size
            )));
        }
        Ok(())
    }
}

/**
    ECIES envelope parameters.

    Defaults follow the eRezept VAU transport: version byte `0x01`,
    HKDF info `"ecies-vau-transport"`, 12-byte IV and an AES-128 key.
    The curve is not part of the config; it is the type parameter of
    [`HybridEncryption`](crate::HybridEncryption).
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EciesConfig {
    pub version: u8,
    #[serde(with = "info_bytes")]
    pub info: Vec<u8>,
    pub iv_size: usize,
    pub aes_key_size: usize,
}

impl Default for EciesConfig {
    fn default() -> Self {
        Self {
            version: ECIES_DEFAULT_VERSION,
            info: ECIES_DEFAULT_INFO.to_vec(),
            iv_size: DEFAULT_IV_SIZE,
            aes_key_size: ECIES_DEFAULT_AES_KEY_SIZE,
        }
    }
}

impl EciesConfig {
    pub fn validate(&self) -> CryptoResult<()> {
        if !matches!(self.aes_key_size, 16 | 24 | 32) {
            return Err(CryptoError::UnsupportedParameter(format!(
                "AES key size must be 16, 24 or 32 bytes, got {}",
                self.aes_key_size
            )));
        }
        if !SUPPORTED_IV_SIZES.contains(&self.iv_size) {
            return Err(CryptoError::UnsupportedParameter(format!(
                "IV size must be one of {SUPPORTED_IV_SIZES:?}, got {}",
                self.iv_size
            )));
        }
        Ok(())
    }
}

/**
    Output encoding of ECDSA signatures.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    /// Fixed-width big-endian `r || s`, each component as wide as the curve order.
    #[default]
    Concatenated,
    /// ASN.1 `SEQUENCE { r INTEGER, s INTEGER }`.
    Der,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcdsaConfig {
    pub encoding: SignatureEncoding,
}

/**
    HKDF info is binary, but in config files it is nearly always text.
    Accept either a string or a byte array; write text back when it is UTF-8.
*/
mod info_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Bytes(Vec<u8>),
    }

    pub fn serialize<S: Serializer>(info: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(info) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.serialize_bytes(info),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.into_bytes(),
            Repr::Bytes(bytes) => bytes,
        })
    }
}
