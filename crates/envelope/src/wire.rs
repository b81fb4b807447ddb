//! The envelope string: `base64(iv) ":" base64(iv || ciphertext)`.
//!
//! The IV appears twice, once on its own and once as the leading block of the
//! payload half. Peers depend on this exact layout. When opening, the IV is
//! taken from the first half and the payload's leading [`IV_LEN`] bytes are
//! discarded without being compared.

use std::fmt;
use std::str::FromStr;

use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurposeConfig, DecodePaddingMode, GeneralPurpose},
    Engine as _,
};

use crate::cipher::IV_LEN;
use crate::error::EnvelopeError;

/// Separator between the two base64 halves. Never part of the base64 alphabet.
pub const DELIMITER: char = ':';

/// Standard alphabet, no line wrapping. Emits `=` padding and accepts input
/// with or without it.
const WIRE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A parsed envelope.
///
/// `blob` always holds at least [`IV_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    iv: [u8; IV_LEN],
    blob: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from an IV and the ciphertext it produced.
    pub fn new(iv: [u8; IV_LEN], ciphertext: &[u8]) -> Self {
        let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(ciphertext);
        Self { iv, blob }
    }

    /// The IV carried in the first half.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// The ciphertext: the payload half with its leading IV copy removed.
    pub fn ciphertext(&self) -> &[u8] {
        &self.blob[IV_LEN..]
    }

    /// Render the transport string.
    pub fn to_wire(&self) -> String {
        format!(
            "{}{}{}",
            WIRE_BASE64.encode(self.iv),
            DELIMITER,
            WIRE_BASE64.encode(&self.blob),
        )
    }

    /// Parse a transport string.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::MalformedEnvelope`] if the delimiter is
    /// missing or repeated, either half is not base64, the IV is not
    /// [`IV_LEN`] bytes, or the payload is shorter than the IV.
    pub fn parse(s: &str) -> Result<Self, EnvelopeError> {
        let (iv_part, blob_part) = s
            .split_once(DELIMITER)
            .ok_or(EnvelopeError::MalformedEnvelope("missing ':' delimiter"))?;
        if blob_part.contains(DELIMITER) {
            return Err(EnvelopeError::MalformedEnvelope(
                "expected exactly two ':'-separated parts",
            ));
        }

        let iv_bytes = WIRE_BASE64
            .decode(iv_part)
            .map_err(|_| EnvelopeError::MalformedEnvelope("IV is not valid base64"))?;
        let iv: [u8; IV_LEN] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| EnvelopeError::MalformedEnvelope("IV must be 16 bytes"))?;

        let blob = WIRE_BASE64
            .decode(blob_part)
            .map_err(|_| EnvelopeError::MalformedEnvelope("payload is not valid base64"))?;
        if blob.len() < IV_LEN {
            return Err(EnvelopeError::MalformedEnvelope(
                "payload is shorter than the IV",
            ));
        }

        Ok(Self { iv, blob })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for Envelope {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_layout_duplicates_iv() {
        let iv = [1u8; IV_LEN];
        let env = Envelope::new(iv, &[9u8; 16]);
        let wire = env.to_wire();
        let (first, second) = wire.split_once(':').unwrap();
        assert_eq!(first, "AQEBAQEBAQEBAQEBAQEBAQ==");
        let blob = WIRE_BASE64.decode(second).unwrap();
        assert_eq!(&blob[..IV_LEN], &iv);
        assert_eq!(&blob[IV_LEN..], &[9u8; 16]);
    }

    #[test]
    fn parse_recovers_parts() {
        let env = Envelope::new([3u8; IV_LEN], &[4u8; 32]);
        let parsed: Envelope = env.to_wire().parse().unwrap();
        assert_eq!(parsed.iv(), &[3u8; IV_LEN]);
        assert_eq!(parsed.ciphertext(), &[4u8; 32]);
    }

    #[test]
    fn parse_accepts_unpadded_base64() {
        let env = Envelope::new([3u8; IV_LEN], &[4u8; 16]);
        let unpadded = env.to_wire().replace('=', "");
        assert_eq!(Envelope::parse(&unpadded).unwrap(), env);
    }

    #[test]
    fn parse_rejects_missing_delimiter() {
        assert!(matches!(
            Envelope::parse("not-a-valid-envelope"),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            Envelope::parse(""),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn parse_rejects_extra_delimiter() {
        let wire = Envelope::new([0u8; IV_LEN], &[0u8; 16]).to_wire();
        let extra = format!("{wire}:AAAA");
        assert!(matches!(
            Envelope::parse(&extra),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn parse_rejects_bad_base64() {
        assert!(Envelope::parse("!!!:AAAA").is_err());
        assert!(Envelope::parse("AAAAAAAAAAAAAAAAAAAAAA==:!!!").is_err());
    }

    #[test]
    fn parse_rejects_short_iv() {
        // 8-byte IV
        assert!(matches!(
            Envelope::parse("AAAAAAAAAAA=:AAAAAAAAAAAAAAAAAAAAAA=="),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn parse_rejects_payload_shorter_than_iv() {
        assert!(matches!(
            Envelope::parse("AAAAAAAAAAAAAAAAAAAAAA==:AAAA"),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn output_never_wraps() {
        let env = Envelope::new([5u8; IV_LEN], &[6u8; 4096]);
        assert!(!env.to_wire().contains('\n'));
    }
}
