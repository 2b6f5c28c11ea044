use der::asn1::ObjectIdentifier;
use der::{Decode, DecodePem, Encode};
use sha2::{Digest, Sha256};
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::CertificatePolicies;

use crate::constants::{ADMISSION_OID, CERTIFICATE_POLICIES_OID, RSA_ENCRYPTION_OID};
use crate::error::{CryptoError, CryptoResult};
use crate::types::{KeyAlgorithm, Oid};

use super::asn1::Asn1Node;

/**
    A parsed X.509 certificate together with its DER encoding.

    Immutable after construction; every accessor works on the already
    decoded structure and never fails. Absent or unreadable extensions are
    reported as `None` / empty rather than as errors.
*/
#[derive(Debug, Clone)]
pub struct Certificate {
    inner: x509_cert::Certificate,
    der: Vec<u8>,
}

/**
    Result of [`Certificate::classify`].
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub key_algorithm: KeyAlgorithm,
    pub certificate_type: Option<Oid>,
    pub profession_oid: Option<String>,
}

impl Certificate {
    /**
        Parse a DER-encoded certificate. Trailing bytes are rejected.
    */
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let inner = x509_cert::Certificate::from_der(der)?;
        Ok(Self {
            inner,
            der: der.to_vec(),
        })
    }

    /**
        Parse a certificate given as base64 of its DER encoding.
        Whitespace (line breaks included) is ignored.
    */
    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let der = data_encoding::BASE64
            .decode(compact.as_bytes())
            .map_err(|e| CryptoError::CertificateFormat(format!("invalid base64: {e}")))?;
        Self::from_der(&der)
    }

    /**
        Parse a single PEM `CERTIFICATE` block.
    */
    pub fn from_pem(text: &str) -> CryptoResult<Self> {
        let inner = <x509_cert::Certificate as DecodePem>::from_pem(text.trim())?;
        let der = inner.to_der()?;
        Ok(Self { inner, der })
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    pub fn x509(&self) -> &x509_cert::Certificate {
        &self.inner
    }

    /**
        Subject distinguished name in RFC 4514 string form.
    */
    pub fn subject(&self) -> String {
        self.inner.tbs_certificate.subject.to_string()
    }

    /**
        Lowercase hex SHA-256 of the DER encoding.
    */
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }

    /**
        Algorithm OID of the SubjectPublicKeyInfo.
    */
    pub fn algorithm_oid(&self) -> ObjectIdentifier {
        self.inner
            .tbs_certificate
            .subject_public_key_info
            .algorithm
            .oid
    }

    pub fn is_rsa_encryption_key(&self) -> bool {
        self.algorithm_oid() == RSA_ENCRYPTION_OID
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        let algorithm = &self.inner.tbs_certificate.subject_public_key_info.algorithm;
        let curve = algorithm
            .parameters
            .as_ref()
            .and_then(|params| params.decode_as::<ObjectIdentifier>().ok());
        KeyAlgorithm::from_spki(algorithm.oid, curve)
    }

    /**
        Policy identifiers of the CertificatePolicies extension, in
        certificate order. Empty when the extension is missing or malformed.
    */
    pub fn policy_oids(&self) -> Vec<ObjectIdentifier> {
        let Some(ext) = self.extension(CERTIFICATE_POLICIES_OID) else {
            return Vec::new();
        };
        match CertificatePolicies::from_der(ext.extn_value.as_bytes()) {
            Ok(policies) => policies
                .0
                .into_iter()
                .map(|info| info.policy_identifier)
                .collect(),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable CertificatePolicies extension");
                Vec::new()
            }
        }
    }

    /**
        The first policy OID (in certificate order) that names a known
        health-card role. Unknown policies are skipped.
    */
    pub fn certificate_type_oid(&self) -> Option<Oid> {
        self.policy_oids()
            .iter()
            .find_map(Oid::from_object_identifier)
    }

    /**
        Registration number of the admission extension: the first
        PrintableString found depth-first in its value. For health-card
        certificates this is the Telematik-ID.
    */
    pub fn profession_oid(&self) -> Option<String> {
        let ext = self.extension(ADMISSION_OID)?;
        let tree = match Asn1Node::parse(ext.extn_value.as_bytes()) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable admission extension");
                return None;
            }
        };
        tree.first_printable_string().map(str::to_owned)
    }

    pub fn classify(&self) -> Classification {
        let classification = Classification {
            key_algorithm: self.key_algorithm(),
            certificate_type: self.certificate_type_oid(),
            profession_oid: self.profession_oid(),
        };
        tracing::trace!(
            key_algorithm = ?classification.key_algorithm,
            certificate_type = ?classification.certificate_type,
            has_profession = classification.profession_oid.is_some(),
            "classified certificate"
        );
        classification
    }

    fn extension(&self, oid: ObjectIdentifier) -> Option<&Extension> {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()?
            .iter()
            .find(|ext| ext.extn_id == oid)
    }
}

impl AsRef<[u8]> for Certificate {
    fn as_ref(&self) -> &[u8] {
        &self.der
    }
}

impl TryFrom<&[u8]> for Certificate {
    type Error = CryptoError;

    fn try_from(der: &[u8]) -> CryptoResult<Self> {
        Self::from_der(der)
    }
}
