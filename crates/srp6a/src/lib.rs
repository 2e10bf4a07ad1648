//! SRP-6a password-authenticated key exchange, both sides of the wire.
//!
//! The host never stores or sees a password. Enrollment turns `(I, p)`
//! into a salted verifier with [`create_salted_verification_key`]; every
//! login then runs a four-message exchange at the end of which both sides
//! hold the same session key `K` and have proven themselves to each other:
//!
//! ```text
//! Client                          Host
//! ------                          ----
//! I, A        -------------->
//!             <--------------     s, B
//! M           -------------->
//!             <--------------     H_AMK
//! ```
//!
//! `M` proves the client knew the password, `H_AMK` proves the host held
//! the verifier. A missing `(s, B)` means the host refused the exchange on
//! a safety check; a missing `H_AMK` means the proof was rejected. All big
//! integers travel as minimal big-endian byte strings (zero is the empty
//! string).
//!
//! ```
//! # fn main() -> Result<(), srp6a::SrpError> {
//! use srp6a::{HashAlg, NgType, SrpClient, SrpConfig, SrpServer, create_salted_verification_key};
//!
//! let cfg = SrpConfig::default();
//! let (salt, verifier) = create_salted_verification_key(
//!     "alice", "password123", HashAlg::Sha256, NgType::Ng2048, None, None, 16, None, cfg,
//! )?;
//!
//! let mut client = SrpClient::new(
//!     "alice", "password123", HashAlg::Sha256, NgType::Ng2048, None, None, None, cfg,
//! )?;
//! let (identity, a_pub) = client.start_authentication();
//!
//! let mut server = SrpServer::new(
//!     &identity, &salt, &verifier, &a_pub, HashAlg::Sha256, NgType::Ng2048, None, None, None, cfg,
//! )?;
//! let (salt_out, b_pub) = server.get_challenge().expect("safety checks passed");
//!
//! let m = client.process_challenge(&salt_out, &b_pub).expect("safety checks passed");
//! let h_amk = server.verify_session(&m).expect("client proof accepted").to_vec();
//! assert!(client.verify_session(&h_amk));
//! assert_eq!(client.get_session_key(), server.get_session_key());
//! # Ok(())
//! # }
//! ```
//!
//! Each `SrpServer`/`SrpClient` instance covers exactly one authentication
//! attempt and owns all of its state; instances move freely across threads.

pub mod big_number;
pub mod client;
pub mod crypto_hash;
mod derive;
pub mod errors;
pub mod groups;
pub mod server;
pub mod verifier;

pub use big_number::BigNumber;
pub use client::{ClientState, SrpClient};
pub use crypto_hash::{HashAlg, HashPart, Hasher};
pub use errors::SrpError;
pub use groups::{NgType, SrpGroup, resolve_group};
pub use server::{ServerState, SrpServer};
pub use verifier::create_salted_verification_key;

/// Private ephemerals are this many random bytes, top bit forced
pub const EPHEMERAL_KEY_LENGTH: usize = 32;

/// Protocol compatibility switches, passed explicitly to every
/// construction site. Both default to off.
///
/// `rfc5054_padding` left-pads the inputs of k and u (and the generator
/// inside H(N) xor H(g)) to the modulus width, which is what RFC 5054
/// exchanges expect. `omit_identity_in_x` keeps the identity out of the
/// private-key hash so an account can be renamed without re-enrollment.
///
/// Both ends of the wire must agree on these, like they must agree on the
/// hash strength and the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SrpConfig {
    pub rfc5054_padding: bool,
    pub omit_identity_in_x: bool,
}
