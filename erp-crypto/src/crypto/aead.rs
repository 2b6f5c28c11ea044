/*!
    AES-GCM with the IV carried in front of the ciphertext.

    Envelope: `IV (iv_size) || ciphertext || tag (tag_size)`.

    A fresh IV is drawn from the backend for every call to `encrypt`; the
    key is supplied per call and never stored.
*/

use crate::backend::{CryptoBackend, RustCryptoBackend};
use crate::config::AeadConfig;
use crate::error::{CryptoError, CryptoResult};

#[derive(Debug, Clone)]
pub struct AeadCipher<B = RustCryptoBackend> {
    config: AeadConfig,
    backend: B,
}

impl Default for AeadCipher {
    fn default() -> Self {
        Self {
            config: AeadConfig::default(),
            backend: RustCryptoBackend,
        }
    }
}

impl AeadCipher {
    pub fn new(config: AeadConfig) -> CryptoResult<Self> {
        Self::with_backend(config, RustCryptoBackend)
    }
}

impl<B: CryptoBackend> AeadCipher<B> {
    pub fn with_backend(config: AeadConfig, backend: B) -> CryptoResult<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &AeadConfig {
        &self.config
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    pub fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        self.encrypt_with_aad(key, plaintext, &[])
    }

    pub fn decrypt(&self, key: &[u8], blob: &[u8]) -> CryptoResult<Vec<u8>> {
        self.decrypt_with_aad(key, blob, &[])
    }

    /**
        Encrypt and authenticate `plaintext`, binding `aad` into the tag.
    */
    pub fn encrypt_with_aad(
        &self,
        key: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let AeadConfig { iv_size, tag_size } = self.config;

        let mut blob = vec![0u8; iv_size];
        self.backend.fill_random(&mut blob)?;
        let sealed = self
            .backend
            .aes_gcm_seal(key, &blob, aad, plaintext, tag_size)?;
        blob.extend_from_slice(&sealed);

        tracing::trace!(
            plaintext_len = plaintext.len(),
            blob_len = blob.len(),
            "aes-gcm encrypt"
        );
        Ok(blob)
    }

    /**
        Inverse of [`encrypt_with_aad`](Self::encrypt_with_aad).

        A blob no longer than the IV is a framing error; anything shorter
        than IV plus tag cannot carry a valid tag and fails authentication.
    */
    pub fn decrypt_with_aad(
        &self,
        key: &[u8],
        blob: &[u8],
        aad: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let AeadConfig { iv_size, tag_size } = self.config;

        if blob.len() <= iv_size {
            return Err(CryptoError::EncryptionFormat(format!(
                "blob of {} bytes does not extend past the {iv_size}-byte IV",
                blob.len()
            )));
        }
        if blob.len() < iv_size + tag_size {
            tracing::debug!(blob_len = blob.len(), "aes-gcm blob shorter than IV and tag");
            return Err(CryptoError::Authentication);
        }

        let (iv, sealed) = blob.split_at(iv_size);
        let plaintext = self
            .backend
            .aes_gcm_open(key, iv, aad, sealed, tag_size)
            .inspect_err(|e| tracing::debug!(error = %e, "aes-gcm decrypt failed"))?;

        tracing::trace!(blob_len = blob.len(), "aes-gcm decrypt");
        Ok(plaintext)
    }
}
