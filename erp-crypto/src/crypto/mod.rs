pub mod aead;
pub mod ecdsa;
pub mod ecies;
pub mod mgf1;
pub mod pss;
pub mod rsa;

use elliptic_curve::{CurveArithmetic, FieldBytes, NonZeroScalar};
use zeroize::Zeroize;

use crate::backend::CryptoBackend;
use crate::error::{CryptoError, CryptoResult};

/**
    Common interface of the signers in this crate.

    `verify` is part of the interface so that signers can be used
    interchangeably with verifying implementations elsewhere; the signers
    here only sign and return [`CryptoError::UnsupportedOperation`].
*/
pub trait SignatureScheme {
    type PrivateKey: ?Sized;
    type PublicKey: ?Sized;

    fn sign(&self, key: &Self::PrivateKey, data: &[u8]) -> CryptoResult<Vec<u8>>;

    fn verify(&self, key: &Self::PublicKey, data: &[u8], signature: &[u8]) -> CryptoResult<bool>;
}

// Rejection sampling; a 256-bit draw lands outside [1, n) with
// probability around 2^-32, so a handful of attempts is plenty.
const SCALAR_ATTEMPTS: usize = 8;

/**
    Draw a uniformly random non-zero scalar from the backend RNG.
*/
pub(crate) fn random_scalar<C, B>(backend: &B) -> CryptoResult<NonZeroScalar<C>>
where
    C: CurveArithmetic,
    B: CryptoBackend + ?Sized,
{
    for _ in 0..SCALAR_ATTEMPTS {
        let mut repr = FieldBytes::<C>::default();
        backend.fill_random(&mut repr)?;
        let candidate: Option<NonZeroScalar<C>> = NonZeroScalar::from_repr(repr.clone()).into();
        repr.as_mut_slice().zeroize();
        if let Some(scalar) = candidate {
            return Ok(scalar);
        }
    }
    Err(CryptoError::CryptoProvider(
        "RNG did not yield a valid scalar".into(),
    ))
}
