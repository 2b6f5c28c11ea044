use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::backend::{CryptoBackend, RustCryptoBackend};
use crate::constants::{HASH_LEN, PSS_SALT_LEN, PSS_TRAILER};
use crate::error::{CryptoError, CryptoResult};

use super::SignatureScheme;
use super::mgf1::mgf1_sha256;
use super::rsa::RsaKeyMaterial;

/**
    RSASSA-PSS signer with the encoding done by hand.

    Parameters (fixed):
      Hash: SHA-256
      MGF: MGF1-SHA-256
      Salt length: 32 bytes, fresh per signature
      Trailer: 0xBC

    Input: the message representative `mHash`. It is placed verbatim into
    `M' = 0x00 * 8 || mHash || salt`, so callers that need signatures a
    standard PSS verifier accepts pass `SHA-256(content)` here.

    Output: exactly `ceil(modBits / 8)` bytes.

    The encoding block is allocated per call and wiped afterwards; nothing
    key- or message-dependent is kept on the signer, so one instance can be
    shared between threads.
*/
#[derive(Debug, Clone, Default)]
pub struct PssSigner<B = RustCryptoBackend> {
    backend: B,
}

impl PssSigner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: CryptoBackend> PssSigner<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn sign(&self, key: &RsaKeyMaterial, message: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut salt = Zeroizing::new([0u8; PSS_SALT_LEN]);
        self.backend.fill_random(salt.as_mut_slice())?;

        let em_bits = key.modulus_bits() - 1;
        let encoded = encode(message, salt.as_slice(), em_bits)?;
        let signature = key.private_transform(&encoded, &self.backend)?;

        tracing::trace!(
            modulus_bits = key.modulus_bits(),
            signature_len = signature.len(),
            "rsa-pss sign"
        );
        Ok(signature)
    }

    pub fn verify(
        &self,
        _key: &RsaKeyMaterial,
        _message: &[u8],
        _signature: &[u8],
    ) -> CryptoResult<bool> {
        Err(CryptoError::UnsupportedOperation(
            "RSA-PSS verification is not provided by this signer",
        ))
    }
}

impl<B: CryptoBackend> SignatureScheme for PssSigner<B> {
    type PrivateKey = RsaKeyMaterial;
    type PublicKey = RsaKeyMaterial;

    fn sign(&self, key: &RsaKeyMaterial, data: &[u8]) -> CryptoResult<Vec<u8>> {
        PssSigner::sign(self, key, data)
    }

    fn verify(&self, key: &RsaKeyMaterial, data: &[u8], signature: &[u8]) -> CryptoResult<bool> {
        PssSigner::verify(self, key, data, signature)
    }
}

/**
    EMSA-PSS-ENCODE (RFC 8017, section 9.1.1) without the initial hash.

    Block layout, `len = ceil(em_bits / 8)`:
      maskedDB (len - hLen - 1) || H (hLen) || 0xBC
    where DB = 0x00.. || 0x01 || salt and the top `8 * len - em_bits` bits
    of the first byte are cleared.
*/
fn encode(message: &[u8], salt: &[u8], em_bits: usize) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let len = em_bits.div_ceil(8);
    let s_len = salt.len();
    if len < HASH_LEN + s_len + 2 {
        return Err(CryptoError::InvalidKey(format!(
            "{len}-byte encoding block cannot hold a {HASH_LEN}-byte hash and {s_len}-byte salt"
        )));
    }

    let h = Sha256::new()
        .chain_update([0u8; 8])
        .chain_update(message)
        .chain_update(salt)
        .finalize();

    let db_len = len - HASH_LEN - 1;
    let mut block = Zeroizing::new(vec![0u8; len]);
    block[db_len - s_len - 1] = 0x01;
    block[db_len - s_len..db_len].copy_from_slice(salt);

    let mask = mgf1_sha256(&h, db_len);
    for (b, m) in block[..db_len].iter_mut().zip(&mask) {
        *b ^= m;
    }
    block[0] &= 0xFF >> (8 * len - em_bits);

    block[db_len..len - 1].copy_from_slice(&h);
    block[len - 1] = PSS_TRAILER;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{BrokenRng, FixedBackend};
    use ::rsa::pkcs1::DecodeRsaPrivateKey;
    use ::rsa::traits::{PrivateKeyParts, PublicKeyParts};
    use ::rsa::{Pss, RsaPrivateKey};

    const RSA2048: &[u8] = include_bytes!("../../testfiles/rsa2048.der");
    const RSA2048_PKCS8: &[u8] = include_bytes!("../../testfiles/rsa2048_pkcs8.der");
    const RSA2049: &[u8] = include_bytes!("../../testfiles/rsa2049.der");
    // Signature over SHA-256("eRezept") with rsa2048.der and salt 0x5A * 32,
    // produced by an independent PSS implementation.
    const KNOWN_SIGNATURE: &[u8] = include_bytes!("../../testfiles/pss_rsa2048_salt5a.sig");

    fn digest(content: &[u8]) -> Vec<u8> {
        Sha256::digest(content).to_vec()
    }

    fn verify_reference(key: &RsaPrivateKey, m_hash: &[u8], signature: &[u8]) {
        key.to_public_key()
            .verify(Pss::new_with_salt::<Sha256>(PSS_SALT_LEN), m_hash, signature)
            .unwrap();
    }

    #[test]
    fn known_answer_with_fixed_salt() {
        let signer = PssSigner::with_backend(FixedBackend::new(&[0x5A]));
        let key = RsaKeyMaterial::from_pkcs1_der(RSA2048).unwrap();
        let sig = signer.sign(&key, &digest(b"eRezept")).unwrap();
        assert_eq!(sig, KNOWN_SIGNATURE);
    }

    #[test]
    fn known_answer_with_plain_key() {
        let reference = RsaPrivateKey::from_pkcs1_der(RSA2048).unwrap();
        let key = RsaKeyMaterial::from_components(
            &reference.n().to_bytes_be(),
            &reference.d().to_bytes_be(),
        )
        .unwrap();
        let signer = PssSigner::with_backend(FixedBackend::new(&[0x5A]));
        let sig = signer.sign(&key, &digest(b"eRezept")).unwrap();
        assert_eq!(sig, KNOWN_SIGNATURE);
    }

    #[test]
    fn signatures_verify_with_standard_pss() {
        let reference = RsaPrivateKey::from_pkcs1_der(RSA2048).unwrap();
        let key = RsaKeyMaterial::from_private_key(&reference).unwrap();
        let m_hash = digest(b"Bundle/0428d416-149e-48a4-977c-394887b3d85c");

        let sig = PssSigner::new().sign(&key, &m_hash).unwrap();
        assert_eq!(sig.len(), 256);
        verify_reference(&reference, &m_hash, &sig);
    }

    #[test]
    fn signing_is_randomized() {
        let key = RsaKeyMaterial::from_pkcs8_der(RSA2048_PKCS8).unwrap();
        let signer = PssSigner::new();
        let m_hash = digest(b"same content");
        let a = signer.sign(&key, &m_hash).unwrap();
        let b = signer.sign(&key, &m_hash).unwrap();
        assert_ne!(a, b);

        let reference = RsaPrivateKey::from_pkcs1_der(RSA2048).unwrap();
        verify_reference(&reference, &m_hash, &a);
        verify_reference(&reference, &m_hash, &b);
    }

    #[test]
    fn modulus_one_bit_past_a_byte_boundary() {
        let reference = RsaPrivateKey::from_pkcs1_der(RSA2049).unwrap();
        let key = RsaKeyMaterial::from_private_key(&reference).unwrap();
        assert_eq!(key.modulus_bits(), 2049);

        let m_hash = digest(b"2049");
        let sig = PssSigner::new().sign(&key, &m_hash).unwrap();
        assert_eq!(sig.len(), 257);
        verify_reference(&reference, &m_hash, &sig);
    }

    #[test]
    fn encoding_layout() {
        let salt = [0x11u8; PSS_SALT_LEN];
        let em = encode(b"abc", &salt, 2047).unwrap();
        assert_eq!(em.len(), 256);
        assert_eq!(em[255], 0xBC);
        assert_eq!(em[0] & 0x80, 0);

        let h = Sha256::new()
            .chain_update([0u8; 8])
            .chain_update(b"abc")
            .chain_update(salt)
            .finalize();
        assert_eq!(&em[223..255], h.as_slice());

        // Unmasking recovers the padding string, the separator and the salt.
        let mask = mgf1_sha256(&h, 223);
        let mut db: Vec<u8> = em[..223].iter().zip(&mask).map(|(a, b)| a ^ b).collect();
        db[0] &= 0x7F;
        assert!(db[..190].iter().all(|&b| b == 0));
        assert_eq!(db[190], 0x01);
        assert_eq!(&db[191..], &salt);
    }

    #[test]
    fn modulus_too_small_for_encoding() {
        // 512-bit modulus: 64-byte block < 32 + 32 + 2
        let mut n = vec![0xC3u8; 64];
        n[63] = 0xC5;
        let key = RsaKeyMaterial::from_components(&n, &[0x03]).unwrap();
        assert!(matches!(
            PssSigner::new().sign(&key, &digest(b"x")),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn rng_failure_is_a_provider_error() {
        let key = RsaKeyMaterial::from_pkcs1_der(RSA2048).unwrap();
        assert!(matches!(
            PssSigner::with_backend(BrokenRng).sign(&key, &digest(b"x")),
            Err(CryptoError::CryptoProvider(_))
        ));
    }

    #[test]
    fn verify_is_unsupported() {
        let key = RsaKeyMaterial::from_pkcs1_der(RSA2048).unwrap();
        let signer = PssSigner::new();
        assert!(matches!(
            SignatureScheme::verify(&signer, &key, b"x", &[0u8; 256]),
            Err(CryptoError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn shared_signer_across_threads() {
        let key = std::sync::Arc::new(RsaKeyMaterial::from_pkcs1_der(RSA2048).unwrap());
        let signer = std::sync::Arc::new(PssSigner::new());
        let m_hash = digest(b"concurrent");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (key, signer, m_hash) = (key.clone(), signer.clone(), m_hash.clone());
                std::thread::spawn(move || signer.sign(&key, &m_hash).unwrap())
            })
            .collect();

        let reference = RsaPrivateKey::from_pkcs1_der(RSA2048).unwrap();
        for handle in handles {
            verify_reference(&reference, &m_hash, &handle.join().unwrap());
        }
    }
}
