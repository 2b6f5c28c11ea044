use core::fmt;
use core::str::FromStr;

use der::asn1::ObjectIdentifier;

use crate::constants::{
    BRAINPOOL_P256R1_OID, EC_PUBLIC_KEY_OID, RSA_ENCRYPTION_OID, SECP256R1_OID, SECP384R1_OID,
};
use crate::error::ParseError;

/**
    Health-card certificate roles, identified by the gematik certificate-type
    OID listed in a certificate's CertificatePolicies extension.

    Ref: gemSpec_OID, table "OID-Festlegung Zertifikatstypen".
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Oid {
    HbaQes,
    HbaEnc,
    HbaAut,
    SmcBEnc,
    SmcBAut,
    SmcBOsig,
    EgkAut,
    EgkAutAlt,
}

impl Oid {
    pub const ALL: [Oid; 8] = [
        Self::HbaQes,
        Self::HbaEnc,
        Self::HbaAut,
        Self::SmcBEnc,
        Self::SmcBAut,
        Self::SmcBOsig,
        Self::EgkAut,
        Self::EgkAutAlt,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::HbaQes => "HBA_QES",
            Self::HbaEnc => "HBA_ENC",
            Self::HbaAut => "HBA_AUT",
            Self::SmcBEnc => "SMC_B_ENC",
            Self::SmcBAut => "SMC_B_AUT",
            Self::SmcBOsig => "SMC_B_OSIG",
            Self::EgkAut => "EGK_AUT",
            Self::EgkAutAlt => "EGK_AUT_ALT",
        }
    }

    pub const fn dotted(self) -> &'static str {
        match self {
            Self::HbaQes => "1.2.276.0.76.4.72",
            Self::HbaEnc => "1.2.276.0.76.4.74",
            Self::HbaAut => "1.2.276.0.76.4.75",
            Self::SmcBEnc => "1.2.276.0.76.4.76",
            Self::SmcBAut => "1.2.276.0.76.4.77",
            Self::SmcBOsig => "1.2.276.0.76.4.78",
            Self::EgkAut => "1.2.276.0.76.4.70",
            Self::EgkAutAlt => "1.2.276.0.76.4.212",
        }
    }

    pub fn object_identifier(self) -> ObjectIdentifier {
        // Every dotted string above is a valid OID literal.
        ObjectIdentifier::new_unwrap(self.dotted())
    }

    /**
        Look up a role by its dotted OID, e.g. `"1.2.276.0.76.4.77"`.
    */
    pub fn from_dotted(dotted: &str) -> Option<Self> {
        let dotted = dotted.trim();
        Self::ALL.into_iter().find(|oid| oid.dotted() == dotted)
    }

    pub fn from_object_identifier(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.object_identifier() == *oid)
    }

    /**
        Look up a role by label. Matching ignores ASCII case and treats `-`
        and `_` alike, so `"smc-b-aut"` resolves to [`Oid::SmcBAut`].
    */
    pub fn from_label(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|oid| oid.label().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Oid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .or_else(|| Self::from_dotted(s))
            .ok_or_else(|| ParseError {
                kind: "certificate type OID",
                value: s.to_owned(),
            })
    }
}

/**
    Named elliptic curves seen on health-card certificates.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    P256,
    P384,
    BrainpoolP256r1,
    Other(ObjectIdentifier),
}

impl NamedCurve {
    pub fn from_oid(oid: ObjectIdentifier) -> Self {
        if oid == SECP256R1_OID {
            Self::P256
        } else if oid == SECP384R1_OID {
            Self::P384
        } else if oid == BRAINPOOL_P256R1_OID {
            Self::BrainpoolP256r1
        } else {
            Self::Other(oid)
        }
    }
}

/**
    Public-key algorithm of a certificate's SubjectPublicKeyInfo.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    /// `curve` is `None` when the parameters are absent or not a named curve.
    Ec { curve: Option<NamedCurve> },
    Other(ObjectIdentifier),
}

impl KeyAlgorithm {
    pub(crate) fn from_spki(algorithm: ObjectIdentifier, curve: Option<ObjectIdentifier>) -> Self {
        if algorithm == RSA_ENCRYPTION_OID {
            Self::Rsa
        } else if algorithm == EC_PUBLIC_KEY_OID {
            Self::Ec {
                curve: curve.map(NamedCurve::from_oid),
            }
        } else {
            Self::Other(algorithm)
        }
    }
}
