/*!
    Pluggable provider for randomness and the AES-GCM primitive.

    Components receive their backend at construction instead of resolving a
    provider by name at call time. The default [`RustCryptoBackend`] draws
    from the operating system RNG and runs AES-GCM through the `aes-gcm`
    crate.
*/

use std::sync::Arc;

use aes::cipher::{BlockCipher, BlockEncrypt, BlockSizeUser, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::AesGcm;
use aes_gcm::aead::generic_array::ArrayLength;
use aes_gcm::aead::generic_array::typenum::{U12, U13, U14, U15, U16};
use aes_gcm::aead::{Aead, Nonce, Payload};
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{CryptoError, CryptoResult};

/**
    Source of secure randomness and the AES-GCM primitive.

    Implementations must be thread-safe; every component in this crate may
    be shared across threads as long as its backend can.
*/
pub trait CryptoBackend: Send + Sync {
    /// Fill `buf` with cryptographically secure random bytes.
    fn fill_random(&self, buf: &mut [u8]) -> CryptoResult<()>;

    /**
        AES-GCM encryption. Returns `ciphertext || tag` with a `tag_size`-byte tag.
        The key length selects AES-128/192/256; `iv` is used verbatim.
    */
    fn aes_gcm_seal(
        &self,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        tag_size: usize,
    ) -> CryptoResult<Vec<u8>>;

    /**
        AES-GCM decryption of `ciphertext || tag`.
        Fails with [`CryptoError::Authentication`] when the tag does not verify.
    */
    fn aes_gcm_open(
        &self,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag_size: usize,
    ) -> CryptoResult<Vec<u8>>;
}

impl<B: CryptoBackend + ?Sized> CryptoBackend for Arc<B> {
    fn fill_random(&self, buf: &mut [u8]) -> CryptoResult<()> {
        (**self).fill_random(buf)
    }

    fn aes_gcm_seal(
        &self,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        tag_size: usize,
    ) -> CryptoResult<Vec<u8>> {
        (**self).aes_gcm_seal(key, iv, aad, plaintext, tag_size)
    }

    fn aes_gcm_open(
        &self,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag_size: usize,
    ) -> CryptoResult<Vec<u8>> {
        (**self).aes_gcm_open(key, iv, aad, ciphertext, tag_size)
    }
}

/**
    Default backend: OS randomness plus the RustCrypto AES-GCM implementation.

    Supported parameters:
      Key: 16, 24 or 32 bytes
      IV: 12 or 16 bytes
      Tag: 12 to 16 bytes
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoBackend;

impl CryptoBackend for RustCryptoBackend {
    fn fill_random(&self, buf: &mut [u8]) -> CryptoResult<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::CryptoProvider(format!("OS RNG failure: {e}")))
    }

    fn aes_gcm_seal(
        &self,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        tag_size: usize,
    ) -> CryptoResult<Vec<u8>> {
        gcm_by_key(key, iv, aad, GcmOp::Seal(plaintext), tag_size)
    }

    fn aes_gcm_open(
        &self,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag_size: usize,
    ) -> CryptoResult<Vec<u8>> {
        gcm_by_key(key, iv, aad, GcmOp::Open(ciphertext), tag_size)
    }
}

/**
    IV sizes the default backend can run.
*/
pub(crate) const SUPPORTED_IV_SIZES: [usize; 2] = [12, 16];

/**
    Tag sizes the default backend can run (GCM allows truncation down to 96 bits).
*/
pub(crate) const SUPPORTED_TAG_SIZES: core::ops::RangeInclusive<usize> = 12..=16;

#[derive(Clone, Copy)]
enum GcmOp<'a> {
    Seal(&'a [u8]),
    Open(&'a [u8]),
}

// The aes-gcm crate fixes key, nonce and tag sizes at the type level, so the
// runtime sizes are resolved one dimension at a time: key, then IV, then tag.

fn gcm_by_key(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    op: GcmOp<'_>,
    tag_size: usize,
) -> CryptoResult<Vec<u8>> {
    match key.len() {
        16 => gcm_by_iv::<Aes128>(key, iv, aad, op, tag_size),
        24 => gcm_by_iv::<Aes192>(key, iv, aad, op, tag_size),
        32 => gcm_by_iv::<Aes256>(key, iv, aad, op, tag_size),
        n => Err(CryptoError::InvalidKey(format!(
            "AES key must be 16, 24 or 32 bytes, got {n}"
        ))),
    }
}

fn gcm_by_iv<A>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    op: GcmOp<'_>,
    tag_size: usize,
) -> CryptoResult<Vec<u8>>
where
    A: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + KeyInit,
{
    match iv.len() {
        12 => gcm_by_tag::<A, U12>(key, iv, aad, op, tag_size),
        16 => gcm_by_tag::<A, U16>(key, iv, aad, op, tag_size),
        n => Err(CryptoError::UnsupportedParameter(format!(
            "AES-GCM IV must be 12 or 16 bytes, got {n}"
        ))),
    }
}

fn gcm_by_tag<A, N>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    op: GcmOp<'_>,
    tag_size: usize,
) -> CryptoResult<Vec<u8>>
where
    A: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + KeyInit,
    N: ArrayLength<u8>,
{
    match tag_size {
        12 => gcm_run::<AesGcm<A, N, U12>>(key, iv, aad, op),
        13 => gcm_run::<AesGcm<A, N, U13>>(key, iv, aad, op),
        14 => gcm_run::<AesGcm<A, N, U14>>(key, iv, aad, op),
        15 => gcm_run::<AesGcm<A, N, U15>>(key, iv, aad, op),
        16 => gcm_run::<AesGcm<A, N, U16>>(key, iv, aad, op),
        n => Err(CryptoError::UnsupportedParameter(format!(
            "AES-GCM tag must be 12 to 16 bytes, got {n}"
        ))),
    }
}

fn gcm_run<C>(key: &[u8], iv: &[u8], aad: &[u8], op: GcmOp<'_>) -> CryptoResult<Vec<u8>>
where
    C: KeyInit + Aead,
{
    let cipher = C::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKey(format!("invalid AES key length {}", key.len())))?;
    // gcm_by_iv picked the nonce type from iv.len(), so the lengths agree.
    let nonce = Nonce::<C>::from_slice(iv);

    match op {
        GcmOp::Seal(plaintext) => cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::CryptoProvider("AES-GCM encryption failed".into())),
        GcmOp::Open(ciphertext) => cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::Authentication),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /**
        Deterministic backend for known-answer tests: "random" output repeats
        `bytes` from the start on every call. AES-GCM is delegated to the
        default backend.
    */
    pub(crate) struct FixedBackend {
        bytes: Vec<u8>,
    }

    impl FixedBackend {
        pub(crate) fn new(bytes: &[u8]) -> Self {
            assert!(!bytes.is_empty());
            Self {
                bytes: bytes.to_vec(),
            }
        }
    }

    impl CryptoBackend for FixedBackend {
        fn fill_random(&self, buf: &mut [u8]) -> CryptoResult<()> {
            for (i, b) in buf.iter_mut().enumerate() {
                *b = self.bytes[i % self.bytes.len()];
            }
            Ok(())
        }

        fn aes_gcm_seal(
            &self,
            key: &[u8],
            iv: &[u8],
            aad: &[u8],
            plaintext: &[u8],
            tag_size: usize,
        ) -> CryptoResult<Vec<u8>> {
            RustCryptoBackend.aes_gcm_seal(key, iv, aad, plaintext, tag_size)
        }

        fn aes_gcm_open(
            &self,
            key: &[u8],
            iv: &[u8],
            aad: &[u8],
            ciphertext: &[u8],
            tag_size: usize,
        ) -> CryptoResult<Vec<u8>> {
            RustCryptoBackend.aes_gcm_open(key, iv, aad, ciphertext, tag_size)
        }
    }

    /// Backend whose RNG always fails.
    pub(crate) struct BrokenRng;

    impl CryptoBackend for BrokenRng {
        fn fill_random(&self, _buf: &mut [u8]) -> CryptoResult<()> {
            Err(CryptoError::CryptoProvider("entropy source unavailable".into()))
        }

        fn aes_gcm_seal(
            &self,
            key: &[u8],
            iv: &[u8],
            aad: &[u8],
            plaintext: &[u8],
            tag_size: usize,
        ) -> CryptoResult<Vec<u8>> {
            RustCryptoBackend.aes_gcm_seal(key, iv, aad, plaintext, tag_size)
        }

        fn aes_gcm_open(
            &self,
            key: &[u8],
            iv: &[u8],
            aad: &[u8],
            ciphertext: &[u8],
            tag_size: usize,
        ) -> CryptoResult<Vec<u8>> {
            RustCryptoBackend.aes_gcm_open(key, iv, aad, ciphertext, tag_size)
        }
    }
}
