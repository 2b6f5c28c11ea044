/*!
    ECIES hybrid encryption as used by the VAU transport.

    Envelope layout:
      version (1) || X (w) || Y (w) || IV (iv_size) || ciphertext || tag (16)

    `X || Y` is the uncompressed ephemeral public key without its SEC1
    `0x04` prefix, each coordinate `w` bytes wide (the curve's field size).
    Everything from the IV on is a single [`AeadCipher`] envelope.

    Key derivation:
      shared = ECDH(ephemeral, recipient).x
      key    = HKDF-SHA256(ikm = shared, salt = none, info)[..aes_key_size]
*/

use std::marker::PhantomData;

use elliptic_curve::ecdh::diffie_hellman;
use elliptic_curve::generic_array::typenum::Unsigned;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{
    AffinePoint, CurveArithmetic, FieldBytesSize, NonZeroScalar, PublicKey, SecretKey,
};
use hkdf::Hkdf;
use p256::NistP256;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::backend::{CryptoBackend, RustCryptoBackend};
use crate::config::{AeadConfig, EciesConfig};
use crate::constants::ECIES_TAG_SIZE;
use crate::error::{CryptoError, CryptoResult};

use super::aead::AeadCipher;
use super::random_scalar;

pub struct HybridEncryption<C = NistP256, B = RustCryptoBackend> {
    config: EciesConfig,
    aead: AeadCipher<B>,
    _curve: PhantomData<fn() -> C>,
}

impl<C> HybridEncryption<C, RustCryptoBackend>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    pub fn new(config: EciesConfig) -> CryptoResult<Self> {
        Self::with_backend(config, RustCryptoBackend)
    }
}

impl<C, B> HybridEncryption<C, B>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
    B: CryptoBackend,
{
    pub fn with_backend(config: EciesConfig, backend: B) -> CryptoResult<Self> {
        config.validate()?;
        let aead = AeadCipher::with_backend(
            AeadConfig {
                iv_size: config.iv_size,
                tag_size: ECIES_TAG_SIZE,
            },
            backend,
        )?;
        Ok(Self {
            config,
            aead,
            _curve: PhantomData,
        })
    }

    pub fn config(&self) -> &EciesConfig {
        &self.config
    }

    /// Byte width of one public-key coordinate.
    pub fn coordinate_len() -> usize {
        FieldBytesSize::<C>::USIZE
    }

    /**
        Bytes preceding the ciphertext: version, both coordinates and the IV.
    */
    pub fn header_len(&self) -> usize {
        1 + 2 * Self::coordinate_len() + self.config.iv_size
    }

    /**
        Encrypt `plaintext` to `recipient` under a fresh ephemeral key.
    */
    pub fn encrypt(&self, recipient: &PublicKey<C>, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let ephemeral = random_scalar::<C, _>(self.aead.backend())?;
        let ephemeral_public = PublicKey::<C>::from_secret_scalar(&ephemeral);

        let key = self.derive_key(&ephemeral, recipient)?;
        let sealed = self.aead.encrypt(&key, plaintext)?;

        let point = ephemeral_public.to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            return Err(CryptoError::CryptoProvider(
                "ephemeral key encoded as identity".into(),
            ));
        };

        let mut envelope = Vec::with_capacity(1 + x.len() + y.len() + sealed.len());
        envelope.push(self.config.version);
        envelope.extend_from_slice(x);
        envelope.extend_from_slice(y);
        envelope.extend_from_slice(&sealed);

        tracing::debug!(
            plaintext_len = plaintext.len(),
            envelope_len = envelope.len(),
            "ecies encrypt"
        );
        Ok(envelope)
    }

    /**
        Decrypt an envelope produced by [`encrypt`](Self::encrypt).
    */
    pub fn decrypt(&self, recipient: &SecretKey<C>, envelope: &[u8]) -> CryptoResult<Vec<u8>> {
        let w = Self::coordinate_len();
        if envelope.len() < self.header_len() {
            return Err(CryptoError::EncryptionFormat(format!(
                "envelope of {} bytes is shorter than the {}-byte header",
                envelope.len(),
                self.header_len()
            )));
        }
        if envelope[0] != self.config.version {
            return Err(CryptoError::EncryptionFormat(format!(
                "unexpected version 0x{:02x}, expected 0x{:02x}",
                envelope[0], self.config.version
            )));
        }

        let coordinates = &envelope[1..1 + 2 * w];
        let mut sec1 = Vec::with_capacity(1 + 2 * w);
        sec1.push(0x04);
        sec1.extend_from_slice(coordinates);
        let ephemeral_public = PublicKey::<C>::from_sec1_bytes(&sec1).map_err(|_| {
            CryptoError::EncryptionFormat("ephemeral key is not a point on the curve".into())
        })?;

        let key = self.derive_key(&recipient.to_nonzero_scalar(), &ephemeral_public)?;
        let plaintext = self.aead.decrypt(&key, &envelope[1 + 2 * w..])?;

        tracing::debug!(envelope_len = envelope.len(), "ecies decrypt");
        Ok(plaintext)
    }

    fn derive_key(
        &self,
        secret: &NonZeroScalar<C>,
        public: &PublicKey<C>,
    ) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let shared = diffie_hellman(secret, public.as_affine());
        let hkdf = Hkdf::<Sha256>::new(None, shared.raw_secret_bytes());
        let mut key = Zeroizing::new(vec![0u8; self.config.aes_key_size]);
        hkdf.expand(&self.config.info, &mut key)
            .map_err(|e| CryptoError::CryptoProvider(format!("HKDF expand failed: {e}")))?;
        Ok(key)
    }
}

impl<C> Default for HybridEncryption<C, RustCryptoBackend>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    fn default() -> Self {
        Self {
            config: EciesConfig::default(),
            aead: AeadCipher::default(),
            _curve: PhantomData,
        }
    }
}
