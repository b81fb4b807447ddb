//! AES-256-CBC payload envelope shared by the mobile apps and the gateway.
//!
//! # Wire format
//!
//! ```text
//! base64(iv) ":" base64(iv || AES-256-CBC-PKCS7(key, iv, utf8(plaintext)))
//! ```
//!
//! - `key`: the shared secret's UTF-8 bytes, zero-padded or truncated to 32 bytes.
//! - `iv`: 16 bytes from the OS CSPRNG, fresh for every seal.
//! - base64: standard alphabet with `=` padding, no line breaks.
//!
//! # Security notes
//!
//! - The key derivation is not a KDF. A short secret yields a key that is
//!   mostly zero bytes.
//! - CBC without a MAC is malleable. Tampering is usually, not always, caught
//!   as a padding failure.
//!
//! Both properties are fixed by the deployed peers and are kept as-is.

pub mod cipher;
pub mod error;
pub mod key;
pub mod request;
pub mod sealer;
pub mod wire;

pub use error::EnvelopeError;
pub use key::{derive, DerivedKey, SharedSecret, KEY_LEN};
pub use request::{Anonymous, RequestError, RequestSealer, SealedRequest, TokenProvider};
pub use sealer::{open, seal, Sealer};
pub use wire::Envelope;
