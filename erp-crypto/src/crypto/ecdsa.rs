use std::marker::PhantomData;
use std::ops::Add;

use ecdsa::der::{MaxOverhead, MaxSize};
use ecdsa::hazmat::{DigestPrimitive, SignPrimitive};
use ecdsa::{Signature, SignatureSize, SigningKey};
use elliptic_curve::generic_array::ArrayLength;
use elliptic_curve::ops::Invert;
use elliptic_curve::subtle::CtOption;
use elliptic_curve::{CurveArithmetic, FieldBytesSize, PrimeCurve, PublicKey, Scalar, SecretKey};
use p256::NistP256;
use sha2::{Digest, Sha256};
use signature::hazmat::PrehashSigner;

use crate::config::{EcdsaConfig, SignatureEncoding};
use crate::error::{CryptoError, CryptoResult};

use super::SignatureScheme;

/**
    Deterministic ECDSA over SHA-256 (RFC 6979).

    Parameters:
      Digest: SHA-256 of the input, for every curve
      Nonce: HMAC-DRBG per RFC 6979, so equal (key, data) give equal signatures
      Output: `r || s`, each as wide as the curve order, unless
              [`SignatureEncoding::Der`] is configured

    `s` is emitted as computed; no low-S normalization is applied.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicSigner<C = NistP256> {
    config: EcdsaConfig,
    _curve: PhantomData<fn() -> C>,
}

impl<C> DeterministicSigner<C>
where
    C: PrimeCurve + CurveArithmetic + DigestPrimitive,
    Scalar<C>: Invert<Output = CtOption<Scalar<C>>> + SignPrimitive<C>,
    SignatureSize<C>: ArrayLength<u8>,
    MaxSize<C>: ArrayLength<u8>,
    <FieldBytesSize<C> as Add>::Output: Add<MaxOverhead> + ArrayLength<u8>,
{
    pub fn new(config: EcdsaConfig) -> Self {
        Self {
            config,
            _curve: PhantomData,
        }
    }

    pub fn config(&self) -> &EcdsaConfig {
        &self.config
    }

    pub fn sign(&self, key: &SecretKey<C>, data: &[u8]) -> CryptoResult<Vec<u8>> {
        self.sign_with(&SigningKey::from(key.to_nonzero_scalar()), data)
    }

    /**
        Sign with a private scalar given as big-endian bytes.
    */
    pub fn sign_raw(&self, scalar: &[u8], data: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = SigningKey::<C>::from_slice(scalar)
            .map_err(|_| CryptoError::InvalidKey("not a valid private scalar".into()))?;
        self.sign_with(&key, data)
    }

    pub fn verify(
        &self,
        _key: &PublicKey<C>,
        _data: &[u8],
        _signature: &[u8],
    ) -> CryptoResult<bool> {
        Err(CryptoError::UnsupportedOperation(
            "ECDSA verification is not provided by this signer",
        ))
    }

    fn sign_with(&self, key: &SigningKey<C>, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let digest = Sha256::digest(data);
        let signature: Signature<C> = key
            .sign_prehash(&digest)
            .map_err(|e| CryptoError::CryptoProvider(format!("ECDSA signing failed: {e}")))?;

        let out = match self.config.encoding {
            SignatureEncoding::Concatenated => signature.to_bytes().to_vec(),
            SignatureEncoding::Der => signature.to_der().as_bytes().to_vec(),
        };

        tracing::trace!(
            data_len = data.len(),
            encoding = ?self.config.encoding,
            "ecdsa sign"
        );
        Ok(out)
    }
}

impl<C> SignatureScheme for DeterministicSigner<C>
where
    C: PrimeCurve + CurveArithmetic + DigestPrimitive,
    Scalar<C>: Invert<Output = CtOption<Scalar<C>>> + SignPrimitive<C>,
    SignatureSize<C>: ArrayLength<u8>,
    MaxSize<C>: ArrayLength<u8>,
    <FieldBytesSize<C> as Add>::Output: Add<MaxOverhead> + ArrayLength<u8>,
{
    type PrivateKey = SecretKey<C>;
    type PublicKey = PublicKey<C>;

    fn sign(&self, key: &SecretKey<C>, data: &[u8]) -> CryptoResult<Vec<u8>> {
        DeterministicSigner::sign(self, key, data)
    }

    fn verify(&self, key: &PublicKey<C>, data: &[u8], signature: &[u8]) -> CryptoResult<bool> {
        DeterministicSigner::verify(self, key, data, signature)
    }
}
