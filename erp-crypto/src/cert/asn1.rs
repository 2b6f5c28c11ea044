/*!
    Minimal DER reader producing a typed node tree.

    Only what the certificate extensions need: definite lengths,
    single-byte tags, bounded nesting. Everything that is not one of the
    named variants is kept as raw content so the tree is always complete.
*/

use der::asn1::{Ia5StringRef, ObjectIdentifier, PrintableStringRef, Utf8StringRef};

use crate::error::{CryptoError, CryptoResult};

const MAX_DEPTH: usize = 32;

const TAG_OCTET_STRING: u8 = 0x04;
const TAG_OBJECT_IDENTIFIER: u8 = 0x06;
const TAG_UTF8_STRING: u8 = 0x0C;
const TAG_PRINTABLE_STRING: u8 = 0x13;
const TAG_IA5_STRING: u8 = 0x16;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;

const CLASS_MASK: u8 = 0xC0;
const CLASS_CONTEXT: u8 = 0x80;
const CONSTRUCTED: u8 = 0x20;
const NUMBER_MASK: u8 = 0x1F;

/**
    A decoded DER element.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asn1Node {
    Sequence(Vec<Asn1Node>),
    Set(Vec<Asn1Node>),
    ObjectIdentifier(ObjectIdentifier),
    PrintableString(String),
    Utf8String(String),
    Ia5String(String),
    OctetString(Vec<u8>),
    /// Constructed context-specific element, e.g. an EXPLICIT `[1]` tag.
    Tagged { number: u8, children: Vec<Asn1Node> },
    /// Primitive context-specific element (IMPLICIT tagging).
    TaggedPrimitive { number: u8, content: Vec<u8> },
    Other { tag: u8, content: Vec<u8> },
}

impl Asn1Node {
    /**
        Parse exactly one DER element. Trailing bytes are an error.
    */
    pub fn parse(der: &[u8]) -> CryptoResult<Self> {
        let (node, rest) = parse_element(der, 0)?;
        if !rest.is_empty() {
            return Err(asn1_error(format!("{} trailing bytes", rest.len())));
        }
        Ok(node)
    }

    /**
        Depth-first, pre-order search for the first PrintableString.

        Descends into SEQUENCE and SET children in encoding order. Tagged
        elements are not entered: inside the admission syntax they hold
        authority names, not the registration number.
    */
    pub fn first_printable_string(&self) -> Option<&str> {
        match self {
            Self::PrintableString(value) => Some(value),
            Self::Sequence(children) | Self::Set(children) => children
                .iter()
                .find_map(|child| child.first_printable_string()),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Asn1Node] {
        match self {
            Self::Sequence(children) | Self::Set(children) | Self::Tagged { children, .. } => {
                children
            }
            _ => &[],
        }
    }
}

fn parse_element(input: &[u8], depth: usize) -> CryptoResult<(Asn1Node, &[u8])> {
    if depth > MAX_DEPTH {
        return Err(asn1_error("nesting too deep"));
    }

    let (&tag, rest) = input
        .split_first()
        .ok_or_else(|| asn1_error("unexpected end of input"))?;
    if tag & NUMBER_MASK == NUMBER_MASK {
        return Err(asn1_error(format!("high tag numbers are not supported (0x{tag:02x})")));
    }

    let (len, rest) = parse_length(rest)?;
    if rest.len() < len {
        return Err(asn1_error(format!(
            "element of {len} bytes exceeds remaining {} bytes",
            rest.len()
        )));
    }
    let (content, rest) = rest.split_at(len);

    let node = match tag {
        TAG_SEQUENCE => Asn1Node::Sequence(parse_children(content, depth)?),
        TAG_SET => Asn1Node::Set(parse_children(content, depth)?),
        TAG_OBJECT_IDENTIFIER => Asn1Node::ObjectIdentifier(
            ObjectIdentifier::from_bytes(content)
                .map_err(|e| asn1_error(format!("invalid OID: {e}")))?,
        ),
        TAG_PRINTABLE_STRING => Asn1Node::PrintableString(
            PrintableStringRef::new(content)
                .map_err(|e| asn1_error(format!("invalid PrintableString: {e}")))?
                .to_string(),
        ),
        TAG_UTF8_STRING => Asn1Node::Utf8String(
            Utf8StringRef::new(content)
                .map_err(|e| asn1_error(format!("invalid UTF8String: {e}")))?
                .to_string(),
        ),
        TAG_IA5_STRING => Asn1Node::Ia5String(
            Ia5StringRef::new(content)
                .map_err(|e| asn1_error(format!("invalid IA5String: {e}")))?
                .to_string(),
        ),
        TAG_OCTET_STRING => Asn1Node::OctetString(content.to_vec()),
        t if t & CLASS_MASK == CLASS_CONTEXT && t & CONSTRUCTED != 0 => Asn1Node::Tagged {
            number: t & NUMBER_MASK,
            children: parse_children(content, depth)?,
        },
        t if t & CLASS_MASK == CLASS_CONTEXT => Asn1Node::TaggedPrimitive {
            number: t & NUMBER_MASK,
            content: content.to_vec(),
        },
        t => Asn1Node::Other {
            tag: t,
            content: content.to_vec(),
        },
    };

    Ok((node, rest))
}

fn parse_children(mut content: &[u8], depth: usize) -> CryptoResult<Vec<Asn1Node>> {
    let mut children = Vec::new();
    while !content.is_empty() {
        let (child, rest) = parse_element(content, depth + 1)?;
        children.push(child);
        content = rest;
    }
    Ok(children)
}

/**
    DER definite length: short form, or long form with up to four length bytes.
*/
fn parse_length(input: &[u8]) -> CryptoResult<(usize, &[u8])> {
    let (&first, rest) = input
        .split_first()
        .ok_or_else(|| asn1_error("missing length"))?;

    if first & 0x80 == 0 {
        return Ok((first as usize, rest));
    }

    let count = (first & 0x7F) as usize;
    if count == 0 {
        return Err(asn1_error("indefinite length is not allowed in DER"));
    }
    if count > 4 || rest.len() < count {
        return Err(asn1_error("invalid long-form length"));
    }

    let (bytes, rest) = rest.split_at(count);
    let len = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    Ok((len, rest))
}

fn asn1_error(reason: impl Into<String>) -> CryptoError {
    CryptoError::CertificateFormat(format!("ASN.1: {}", reason.into()))
}
