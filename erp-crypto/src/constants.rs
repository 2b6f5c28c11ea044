use der::asn1::ObjectIdentifier;

// ── X.509 ─────────────────────────────────────────────────────────────

/**
    `rsaEncryption` (PKCS#1): `1.2.840.113549.1.1.1`
*/
pub const RSA_ENCRYPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/**
    `id-ecPublicKey` (RFC 5480): `1.2.840.10045.2.1`
*/
pub const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/**
    CertificatePolicies extension: `2.5.29.32`
*/
pub const CERTIFICATE_POLICIES_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.32");

/**
    ISIS-MTT / Common PKI admission extension: `1.3.36.8.3.3`

    Health-card certificates carry the Telematik-ID as the registration
    number of the first profession info inside this extension.
*/
pub const ADMISSION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.8.3.3");

pub const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
pub const SECP384R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
pub const BRAINPOOL_P256R1_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.7");

// ── AES-GCM ───────────────────────────────────────────────────────────

pub const DEFAULT_IV_SIZE: usize = 12;
pub const DEFAULT_TAG_SIZE: usize = 16;

// ── ECIES ─────────────────────────────────────────────────────────────

pub const ECIES_DEFAULT_VERSION: u8 = 0x01;
pub const ECIES_DEFAULT_INFO: &[u8] = b"ecies-vau-transport";
pub const ECIES_DEFAULT_AES_KEY_SIZE: usize = 16;

/**
    Tag size of the AEAD layer inside an ECIES envelope (full 128-bit tag).
*/
pub const ECIES_TAG_SIZE: usize = 16;

// ── RSASSA-PSS ────────────────────────────────────────────────────────

/// SHA-256 output length, also used as the PSS salt length.
pub const HASH_LEN: usize = 32;
pub const PSS_SALT_LEN: usize = HASH_LEN;

/**
    The implicit PSS trailer field (RFC 8017, section 9.1.1).
*/
pub const PSS_TRAILER: u8 = 0xBC;
