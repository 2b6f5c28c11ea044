/*!
    Health-card certificate classification.

    Reads the SubjectPublicKeyInfo algorithm, the CertificatePolicies
    extension (mapped onto [`Oid`](crate::Oid) roles) and the admission
    extension that carries the Telematik-ID. Chain and revocation checks
    belong to the callers.
*/

mod asn1;
mod certificate;
mod encryption;

pub use asn1::Asn1Node;
pub use certificate::{Certificate, Classification};
pub use encryption::EncryptionCertificate;
