//! Byte-span scanner for issuer-signed element values.
//!
//! The typed decoder in [`crate::decode`] parses `elementValue` into a
//! [`serde_cbor::Value`], and re-serializing that value is not guaranteed to
//! reproduce the wallet's original encoding. Proof verification binds to the
//! exact bytes the wallet committed to, so this module walks the raw document
//! and records the byte range of every `elementValue`, in wire order, without
//! re-encoding anything.
//!
//! Only definite-length CBOR is accepted. Indefinite-length items make spans
//! ambiguous under re-encoding and are rejected outright.

use std::ops::Range;

use mdv_core::VerifyError;

/// Nesting bound for attacker-supplied documents.
const MAX_DEPTH: usize = 64;

/// One issuer-signed element located in the raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeSpan {
    pub namespace: String,
    pub id: String,
    /// Byte range of the `elementValue` item within the document.
    pub value: Range<usize>,
}

/// Walks a raw credential document and returns the spans of all
/// `elementValue` items under `issuerSigned`, in wire order.
pub(crate) fn issuer_signed_spans(doc: &[u8]) -> Result<Vec<AttributeSpan>, VerifyError> {
    let mut r = Reader::new(doc);
    let (major, entries) = r.header()?;
    if major != MAJOR_MAP {
        return Err(decode_err("credential document is not a CBOR map"));
    }
    let mut spans = Vec::new();
    let mut seen = false;
    for _ in 0..entries {
        let key = r.text()?;
        if key == "issuerSigned" {
            seen = true;
            scan_issuer_signed(&mut r, &mut spans)?;
        } else {
            r.skip(0)?;
        }
    }
    if !seen {
        return Err(decode_err("credential document has no issuerSigned map"));
    }
    Ok(spans)
}

fn scan_issuer_signed(r: &mut Reader<'_>, spans: &mut Vec<AttributeSpan>) -> Result<(), VerifyError> {
    let (major, namespaces) = r.header()?;
    if major != MAJOR_MAP {
        return Err(decode_err("issuerSigned is not a map"));
    }
    for _ in 0..namespaces {
        let namespace = r.text()?;
        let (major, items) = r.header()?;
        if major != MAJOR_ARRAY {
            return Err(decode_err("issuerSigned namespace is not an array"));
        }
        for _ in 0..items {
            let (major, fields) = r.header()?;
            if major != MAJOR_MAP {
                return Err(decode_err("signed item is not a map"));
            }
            let mut id = None;
            let mut value = None;
            for _ in 0..fields {
                match r.text()?.as_str() {
                    "elementIdentifier" => id = Some(r.text()?),
                    "elementValue" => {
                        let start = r.pos;
                        r.skip(0)?;
                        value = Some(start..r.pos);
                    }
                    _ => r.skip(0)?,
                }
            }
            match (id, value) {
                (Some(id), Some(value)) => spans.push(AttributeSpan {
                    namespace: namespace.clone(),
                    id,
                    value,
                }),
                _ => {
                    return Err(decode_err(
                        "signed item is missing elementIdentifier or elementValue",
                    ))
                }
            }
        }
    }
    Ok(())
}

const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;

fn decode_err(msg: &str) -> VerifyError {
    VerifyError::Decode(msg.to_string())
}

/// Minimal cursor over definite-length CBOR.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8, VerifyError> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| decode_err("truncated CBOR item"))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: u64) -> Result<&'a [u8], VerifyError> {
        let n = usize::try_from(n).map_err(|_| decode_err("CBOR length overflows address space"))?;
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| decode_err("truncated CBOR item"))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads an item header, returning its major type and argument. Rejects
    /// indefinite-length markers and reserved additional-info values.
    fn header(&mut self) -> Result<(u8, u64), VerifyError> {
        let initial = self.byte()?;
        let major = initial >> 5;
        let arg = match initial & 0x1f {
            ai @ 0..=23 => u64::from(ai),
            24 => u64::from(self.byte()?),
            25 => be_uint(self.take(2)?),
            26 => be_uint(self.take(4)?),
            27 => be_uint(self.take(8)?),
            _ => {
                return Err(decode_err(
                    "indefinite-length and reserved CBOR items are not supported",
                ))
            }
        };
        Ok((major, arg))
    }

    fn text(&mut self) -> Result<String, VerifyError> {
        let (major, len) = self.header()?;
        if major != MAJOR_TEXT {
            return Err(decode_err("expected a text string"));
        }
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| decode_err("text string is not valid UTF-8"))
    }

    /// Advances past one complete item.
    fn skip(&mut self, depth: usize) -> Result<(), VerifyError> {
        if depth > MAX_DEPTH {
            return Err(decode_err("CBOR nesting exceeds supported depth"));
        }
        let (major, arg) = self.header()?;
        match major {
            MAJOR_BYTES | MAJOR_TEXT => {
                self.take(arg)?;
            }
            MAJOR_ARRAY => {
                for _ in 0..arg {
                    self.skip(depth + 1)?;
                }
            }
            MAJOR_MAP => {
                for _ in 0..arg {
                    self.skip(depth + 1)?;
                    self.skip(depth + 1)?;
                }
            }
            MAJOR_TAG => self.skip(depth + 1)?,
            // Unsigned, negative, and simple/float items are fully consumed
            // by the header read.
            _ => {}
        }
        Ok(())
    }
}

fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}
