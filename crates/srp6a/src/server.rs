// SrpServer - host side of the SRP-6a handshake
// Consumes (I, s, v, A), issues (s, B), checks the client's proof M and
// answers it with H_AMK

use subtle::ConstantTimeEq;

use crate::{EPHEMERAL_KEY_LENGTH, SrpConfig};
use crate::big_number::BigNumber;
use crate::crypto_hash::HashAlg;
use crate::derive;
use crate::errors::SrpError;
use crate::groups::{NgType, resolve_group};

/// Host-side session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// A ≡ 0 (mod N) or u == 0; no challenge will be issued
    SafetyFailed,
    /// Challenge computed, waiting for the client's proof
    Challenged,
    /// Client proof accepted, session key released
    Authenticated,
    /// Client proof mismatched, nothing further will be accepted
    Rejected,
}

/// Values derived once the safety checks pass
#[derive(Debug)]
struct ServerSession {
    /// Host private ephemeral (b)
    b: BigNumber,
    /// Host public ephemeral (B) = (k*v + g^b) mod N
    big_b: BigNumber,
    /// Session key K = H(S)
    key: Vec<u8>,
    /// Expected client proof M
    proof: Vec<u8>,
    /// Host proof H_AMK = H(A || M || K)
    host_proof: Vec<u8>,
}

/// Host ("Verifier") role of the exchange.
///
/// One instance per authentication attempt. Everything secret-dependent is
/// derived up front at construction; afterwards the machine only hands out
/// precomputed values as its state allows.
#[derive(Debug)]
pub struct SrpServer {
    identity: String,
    /// Salt (s) - integer image of the stored salt bytes
    s: BigNumber,
    state: ServerState,
    session: Option<ServerSession>,
}

impl SrpServer {
    /// Build the host machine and run the SRP-6a safety checks.
    ///
    /// `private_ephemeral` fixes b for reproducible sessions and must be
    /// exactly 32 bytes. Construction fails only on configuration errors;
    /// a failed safety check is reported through the state instead.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: &str,
        salt: &[u8],
        verifier: &[u8],
        client_public: &[u8],
        alg: HashAlg,
        ng: NgType,
        n_hex: Option<&str>,
        g_hex: Option<&str>,
        private_ephemeral: Option<&[u8]>,
        cfg: SrpConfig,
    ) -> Result<Self, SrpError> {
        let group = resolve_group(ng, n_hex, g_hex)?;
        if let Some(bytes) = private_ephemeral {
            if bytes.len() != EPHEMERAL_KEY_LENGTH {
                return Err(SrpError::EphemeralKeyLength(bytes.len()));
            }
        }

        let s = BigNumber::from_bytes_be(salt);
        let v = BigNumber::from_bytes_be(verifier);
        // A is kept unreduced; the hashes below see it exactly as received
        let big_a = BigNumber::from_bytes_be(client_public);

        if (&big_a % &group.n).is_zero() {
            tracing::warn!(
                "[{}] client public ephemeral is a multiple of N, refusing challenge",
                identity
            );
            return Ok(SrpServer {
                identity: identity.to_string(),
                s,
                state: ServerState::SafetyFailed,
                session: None,
            });
        }

        let k = derive::multiplier(alg, cfg, &group);
        let b = match private_ephemeral {
            Some(bytes) => BigNumber::from_bytes_be(bytes),
            None => BigNumber::random_of_length(EPHEMERAL_KEY_LENGTH),
        };

        // B = (k*v + g^b) mod N
        let g_pow_b = group.g.mod_exp(&b, &group.n);
        let k_times_v = &k * &v;
        let big_b = &(&k_times_v + &g_pow_b) % &group.n;

        let u = derive::scrambler(alg, cfg, &group, &big_a, &big_b);
        if u.is_zero() {
            tracing::warn!("[{}] scrambling parameter is zero, refusing challenge", identity);
            return Ok(SrpServer {
                identity: identity.to_string(),
                s,
                state: ServerState::SafetyFailed,
                session: None,
            });
        }

        // S = (A * v^u)^b mod N
        let v_pow_u = v.mod_exp(&u, &group.n);
        let a_times_v = &big_a * &v_pow_u;
        let big_s = a_times_v.mod_exp(&b, &group.n);

        let key = derive::session_key(alg, &big_s);
        let proof = derive::client_proof(alg, cfg, &group, identity, &s, &big_a, &big_b, &key);
        let host_proof = derive::host_proof(alg, &big_a, &proof, &key);

        tracing::debug!(
            "[{}] challenge ready ({}-bit group)",
            identity,
            group.n.num_bytes() * 8
        );

        Ok(SrpServer {
            identity: identity.to_string(),
            s,
            state: ServerState::Challenged,
            session: Some(ServerSession {
                b,
                big_b,
                key,
                proof,
                host_proof,
            }),
        })
    }

    /// Salt and host public ephemeral for the client, minimal encodings.
    /// Nothing once a safety check has failed.
    pub fn get_challenge(&self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.session
            .as_ref()
            .map(|session| (self.s.to_bytes_be(), session.big_b.to_bytes_be()))
    }

    /// Check the client's proof. A match answers with H_AMK; a mismatch
    /// rejects the session for good.
    pub fn verify_session(&mut self, client_proof: &[u8]) -> Option<&[u8]> {
        if self.state == ServerState::Rejected {
            return None;
        }
        let matches = bool::from(
            self.session
                .as_ref()?
                .proof
                .as_slice()
                .ct_eq(client_proof),
        );
        if matches {
            if self.state == ServerState::Challenged {
                tracing::debug!("[{}] client proof verified, session authenticated", self.identity);
            }
            self.state = ServerState::Authenticated;
            self.session
                .as_ref()
                .map(|session| session.host_proof.as_slice())
        } else {
            if self.state == ServerState::Challenged {
                tracing::warn!("[{}] client proof mismatch, rejecting session", self.identity);
                self.state = ServerState::Rejected;
            }
            None
        }
    }

    /// K, released only once the client has proven itself
    pub fn get_session_key(&self) -> Option<&[u8]> {
        match self.state {
            ServerState::Authenticated => {
                self.session.as_ref().map(|session| session.key.as_slice())
            }
            _ => None,
        }
    }

    /// Minimal encoding of the private ephemeral b
    pub fn get_ephemeral_secret(&self) -> Option<Vec<u8>> {
        self.session.as_ref().map(|session| session.b.to_bytes_be())
    }

    pub fn get_identity(&self) -> &str {
        &self.identity
    }

    pub fn authenticated(&self) -> bool {
        self.state == ServerState::Authenticated
    }

    pub fn state(&self) -> ServerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::resolve_group;
    use crate::verifier::create_salted_verification_key;

    fn enroll() -> (Vec<u8>, Vec<u8>) {
        create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            16,
            Some(&[9u8; 16]),
            SrpConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_safety_failed_on_zero_client_public() {
        let (salt, verifier) = enroll();
        let mut server = SrpServer::new(
            "alice",
            &salt,
            &verifier,
            &[],
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            None,
            SrpConfig::default(),
        )
        .unwrap();
        assert_eq!(server.state(), ServerState::SafetyFailed);
        assert!(server.get_challenge().is_none());
        assert!(server.get_ephemeral_secret().is_none());
        assert!(server.verify_session(&[0u8; 32]).is_none());
        assert!(!server.authenticated());
    }

    #[test]
    fn test_safety_failed_on_multiple_of_n() {
        let (salt, verifier) = enroll();
        let n = resolve_group(NgType::Ng2048, None, None).unwrap().n;
        let server = SrpServer::new(
            "alice",
            &salt,
            &verifier,
            &n.to_bytes_be(),
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            None,
            SrpConfig::default(),
        )
        .unwrap();
        assert_eq!(server.state(), ServerState::SafetyFailed);
    }

    #[test]
    fn test_fixed_ephemeral_is_reproducible() {
        let (salt, verifier) = enroll();
        let b = [0x42u8; 32];
        let build = || {
            SrpServer::new(
                "alice",
                &salt,
                &verifier,
                &[0x11u8; 64],
                HashAlg::Sha256,
                NgType::Ng2048,
                None,
                None,
                Some(&b),
                SrpConfig::default(),
            )
            .unwrap()
        };
        assert_eq!(build().get_challenge(), build().get_challenge());
        assert_eq!(build().get_ephemeral_secret().unwrap(), b.to_vec());
    }

    #[test]
    fn test_wrong_ephemeral_length_is_an_error() {
        let (salt, verifier) = enroll();
        let err = SrpServer::new(
            "alice",
            &salt,
            &verifier,
            &[0x11u8; 64],
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            Some(&[1u8; 31]),
            SrpConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SrpError::EphemeralKeyLength(31));
    }

    #[test]
    fn test_wrong_proof_rejects_for_good() {
        let (salt, verifier) = enroll();
        let mut server = SrpServer::new(
            "alice",
            &salt,
            &verifier,
            &[0x11u8; 64],
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            None,
            SrpConfig::default(),
        )
        .unwrap();
        assert_eq!(server.state(), ServerState::Challenged);
        assert!(server.verify_session(&[0u8; 32]).is_none());
        assert_eq!(server.state(), ServerState::Rejected);
        // rejected stays rejected, even for a repeat of the same call
        assert!(server.verify_session(&[0u8; 32]).is_none());
        assert!(server.get_session_key().is_none());
        // the challenge itself is still readable, it was already public
        assert!(server.get_challenge().is_some());
    }

    #[test]
    fn test_custom_group_error_propagates() {
        let (salt, verifier) = enroll();
        let err = SrpServer::new(
            "alice",
            &salt,
            &verifier,
            &[0x11u8; 64],
            HashAlg::Sha256,
            NgType::NgCustom,
            None,
            Some("5"),
            None,
            SrpConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SrpError::MissingCustomGroup);
    }
}
