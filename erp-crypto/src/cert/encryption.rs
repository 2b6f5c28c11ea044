use crate::error::{CryptoError, CryptoResult};

use super::certificate::Certificate;

/**
    A certificate known to carry an RSA encryption key.

    Health-card ENC certificates are the targets of document encryption;
    the Telematik-ID identifies the recipient institution or person.
*/
#[derive(Debug, Clone)]
pub struct EncryptionCertificate {
    certificate: Certificate,
}

impl EncryptionCertificate {
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        Certificate::from_der(der)?.try_into()
    }

    /**
        Telematik-ID of the certificate holder, if the admission extension
        carries one.
    */
    pub fn telematik_id(&self) -> Option<String> {
        self.certificate.profession_oid()
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn into_certificate(self) -> Certificate {
        self.certificate
    }
}

impl TryFrom<Certificate> for EncryptionCertificate {
    type Error = CryptoError;

    fn try_from(certificate: Certificate) -> CryptoResult<Self> {
        if !certificate.is_rsa_encryption_key() {
            return Err(CryptoError::CertificateFormat(format!(
                "expected an rsaEncryption key, found {}",
                certificate.algorithm_oid()
            )));
        }
        Ok(Self { certificate })
    }
}

impl AsRef<Certificate> for EncryptionCertificate {
    fn as_ref(&self) -> &Certificate {
        &self.certificate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rsa_enc_certificate() {
        let cert =
            EncryptionCertificate::from_der(include_bytes!("../../testfiles/smcb_enc.der")).unwrap();
        assert_eq!(
            cert.telematik_id().as_deref(),
            Some("5-SMC-B-Testkarte-883110000116873")
        );
        assert!(cert.certificate().is_rsa_encryption_key());
    }

    #[test]
    fn telematik_id_may_be_absent() {
        let cert =
            EncryptionCertificate::from_der(include_bytes!("../../testfiles/unknown_policy.der"))
                .unwrap();
        assert_eq!(cert.telematik_id(), None);
    }

    #[test]
    fn rejects_ec_certificate() {
        let err = EncryptionCertificate::from_der(include_bytes!("../../testfiles/smcb_aut.der"))
            .unwrap_err();
        match err {
            CryptoError::CertificateFormat(msg) => assert!(msg.contains("1.2.840.10045.2.1")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
