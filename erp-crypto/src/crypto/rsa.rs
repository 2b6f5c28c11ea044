/*!
    RSA private-key operation for the hand-built PSS signer.

    CRT keys are blinded and fault-checked; keys known only by `(n, d)`
    fall back to a plain `m^d mod n`.
*/

use core::fmt;

use num_bigint_dig::{BigInt, BigUint, ModInverse, Sign};
use num_traits::{One, Zero};
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use zeroize::{Zeroize, Zeroizing};

use crate::backend::CryptoBackend;
use crate::error::{CryptoError, CryptoResult};

const BLINDING_ATTEMPTS: usize = 8;

/**
    Private RSA key in the form the private transform needs.
*/
pub struct RsaKeyMaterial {
    n: BigUint,
    form: PrivateForm,
}

enum PrivateForm {
    Crt {
        e: BigUint,
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    },
    Plain {
        d: BigUint,
    },
}

impl RsaKeyMaterial {
    pub fn from_pkcs1_der(der: &[u8]) -> CryptoResult<Self> {
        let key = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("PKCS#1 private key: {e}")))?;
        Self::from_private_key(&key)
    }

    pub fn from_pkcs8_der(der: &[u8]) -> CryptoResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("PKCS#8 private key: {e}")))?;
        Self::from_private_key(&key)
    }

    /**
        Build from a parsed key. Two-prime keys use the CRT path; keys with
        more primes are handled as plain `(n, d)`.
    */
    pub fn from_private_key(key: &RsaPrivateKey) -> CryptoResult<Self> {
        let n = key.n().clone();
        let d = key.d();

        let form = match key.primes() {
            [p, q] => {
                let dp = d % (p - BigUint::one());
                let dq = d % (q - BigUint::one());
                let qinv = inverse_mod(q, p)
                    .ok_or_else(|| CryptoError::InvalidKey("q is not invertible mod p".into()))?;
                PrivateForm::Crt {
                    e: key.e().clone(),
                    p: p.clone(),
                    q: q.clone(),
                    dp,
                    dq,
                    qinv,
                }
            }
            _ => PrivateForm::Plain { d: d.clone() },
        };

        Self::checked(n, form)
    }

    /**
        Key given only by modulus and private exponent, both big-endian.
        The transform is then unblinded and unchecked.
    */
    pub fn from_components(modulus: &[u8], private_exponent: &[u8]) -> CryptoResult<Self> {
        let n = BigUint::from_bytes_be(modulus);
        let d = BigUint::from_bytes_be(private_exponent);
        if d.is_zero() || d >= n {
            return Err(CryptoError::InvalidKey(
                "private exponent must be in [1, n)".into(),
            ));
        }
        Self::checked(n, PrivateForm::Plain { d })
    }

    fn checked(n: BigUint, form: PrivateForm) -> CryptoResult<Self> {
        let odd = n.to_bytes_le().first().is_some_and(|b| b & 1 == 1);
        if n.bits() < 2 || !odd {
            return Err(CryptoError::InvalidKey("modulus must be odd and > 1".into()));
        }
        Ok(Self { n, form })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub fn modulus_bits(&self) -> usize {
        self.n.bits()
    }

    /// Modulus length in bytes, which is also the signature length.
    pub fn size(&self) -> usize {
        self.modulus_bits().div_ceil(8)
    }

    pub fn is_crt(&self) -> bool {
        matches!(self.form, PrivateForm::Crt { .. })
    }

    /**
        `m^d mod n`, left-padded to [`size`](Self::size) bytes.

        Input must be smaller than the modulus. On the CRT path the input is
        blinded with a random unit drawn from `backend` and the result is
        checked against the public exponent before it is released.
    */
    pub(crate) fn private_transform<B>(&self, input: &[u8], backend: &B) -> CryptoResult<Vec<u8>>
    where
        B: CryptoBackend + ?Sized,
    {
        let m = Zeroizing::new(BigUint::from_bytes_be(input));
        if *m >= self.n {
            return Err(CryptoError::InvalidKey(
                "input is not smaller than the modulus".into(),
            ));
        }

        let s = match &self.form {
            PrivateForm::Plain { d } => m.modpow(d, &self.n),
            PrivateForm::Crt {
                e,
                p,
                q,
                dp,
                dq,
                qinv,
            } => {
                let (r, r_inv) = self.blinding_pair(backend)?;
                let blinded = Zeroizing::new((&*m * r.modpow(e, &self.n)) % &self.n);

                let m1 = blinded.modpow(dp, p);
                let m2 = blinded.modpow(dq, q);
                let diff = (&m1 + p - (&m2 % p)) % p;
                let h = (qinv * diff) % p;
                let s_blinded = Zeroizing::new(&m2 + h * q);

                let s = (&*s_blinded * &*r_inv) % &self.n;
                if s.modpow(e, &self.n) != *m {
                    tracing::debug!("rsa crt result failed the public-exponent check");
                    return Err(CryptoError::CryptoProvider(
                        "RSA private operation produced an inconsistent result".into(),
                    ));
                }
                s
            }
        };

        Ok(left_pad(&s.to_bytes_be(), self.size()))
    }

    /**
        Random `r` in `[1, n)` with its inverse mod n.
    */
    fn blinding_pair<B>(
        &self,
        backend: &B,
    ) -> CryptoResult<(Zeroizing<BigUint>, Zeroizing<BigUint>)>
    where
        B: CryptoBackend + ?Sized,
    {
        let mut bytes = Zeroizing::new(vec![0u8; self.size()]);
        for _ in 0..BLINDING_ATTEMPTS {
            backend.fill_random(&mut bytes)?;
            let r = Zeroizing::new(BigUint::from_bytes_be(&bytes) % &self.n);
            if r.is_zero() {
                continue;
            }
            if let Some(r_inv) = inverse_mod(&r, &self.n) {
                return Ok((r, Zeroizing::new(r_inv)));
            }
        }
        Err(CryptoError::CryptoProvider(
            "RNG did not yield a usable blinding factor".into(),
        ))
    }
}

impl TryFrom<&RsaPrivateKey> for RsaKeyMaterial {
    type Error = CryptoError;

    fn try_from(key: &RsaPrivateKey) -> CryptoResult<Self> {
        Self::from_private_key(key)
    }
}

impl fmt::Debug for RsaKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyMaterial")
            .field("modulus_bits", &self.modulus_bits())
            .field("crt", &self.is_crt())
            .finish_non_exhaustive()
    }
}

impl Drop for RsaKeyMaterial {
    fn drop(&mut self) {
        match &mut self.form {
            PrivateForm::Crt {
                p, q, dp, dq, qinv, ..
            } => {
                p.zeroize();
                q.zeroize();
                dp.zeroize();
                dq.zeroize();
                qinv.zeroize();
            }
            PrivateForm::Plain { d } => d.zeroize(),
        }
    }
}

/**
    `a^-1 mod m` as a non-negative value, if it exists.
*/
fn inverse_mod(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let inv = a.clone().mod_inverse(m)?;
    let inv = if inv.sign() == Sign::Minus {
        inv + BigInt::from_biguint(Sign::Plus, m.clone())
    } else {
        inv
    };
    inv.to_biguint()
}

fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(bytes);
    out
}
