// SrpClient - password-holding side of the SRP-6a handshake
// Emits (I, A), turns the host challenge (s, B) into the proof M, then
// checks the host's H_AMK before trusting the session key

use subtle::ConstantTimeEq;

use crate::{EPHEMERAL_KEY_LENGTH, SrpConfig};
use crate::big_number::BigNumber;
use crate::crypto_hash::HashAlg;
use crate::derive;
use crate::errors::SrpError;
use crate::groups::{NgType, SrpGroup, resolve_group};

/// Client-side session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Built, first message not yet produced
    Created,
    /// (I, A) handed out, waiting for the challenge
    Started,
    /// B ≡ 0 (mod N) or u == 0; the exchange is abandoned
    SafetyFailed,
    /// Proof M produced, waiting for the host's answer
    Responded,
    /// Host proof accepted, session key released
    Authenticated,
    /// Host proof mismatched, nothing further will be accepted
    Rejected,
}

/// Values derived from a processed challenge
#[derive(Debug)]
struct ClientSession {
    /// Session key K = H(S)
    key: Vec<u8>,
    /// Expected host proof H_AMK
    host_proof: Vec<u8>,
}

/// Client ("User") role of the exchange.
///
/// One instance per authentication attempt; a fresh ephemeral is drawn at
/// construction unless one is supplied.
#[derive(Debug)]
pub struct SrpClient {
    identity: String,
    password: String,
    alg: HashAlg,
    cfg: SrpConfig,
    group: SrpGroup,
    /// Multiplier k = H(N, g), fixed per group and padding mode
    k: BigNumber,
    /// Client private ephemeral (a)
    a: BigNumber,
    /// Client public ephemeral (A) = g^a mod N
    big_a: BigNumber,
    state: ClientState,
    session: Option<ClientSession>,
}

impl SrpClient {
    /// Build the client machine. `private_ephemeral` fixes a for
    /// reproducible sessions and must be exactly 32 bytes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: &str,
        password: &str,
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

        let k = derive::multiplier(alg, cfg, &group);
        let a = match private_ephemeral {
            Some(bytes) => BigNumber::from_bytes_be(bytes),
            None => BigNumber::random_of_length(EPHEMERAL_KEY_LENGTH),
        };
        let big_a = group.g.mod_exp(&a, &group.n);

        Ok(SrpClient {
            identity: identity.to_string(),
            password: password.to_string(),
            alg,
            cfg,
            group,
            k,
            a,
            big_a,
            state: ClientState::Created,
            session: None,
        })
    }

    /// First message of the exchange: identity and public ephemeral A
    pub fn start_authentication(&mut self) -> (String, Vec<u8>) {
        if self.state == ClientState::Created {
            self.state = ClientState::Started;
        }
        (self.identity.clone(), self.big_a.to_bytes_be())
    }

    /// Derive the shared values from the host challenge and produce the
    /// proof M. None on a failed safety check or from any state past
    /// Started; one challenge per instance.
    pub fn process_challenge(&mut self, salt: &[u8], host_public: &[u8]) -> Option<Vec<u8>> {
        match self.state {
            ClientState::Created | ClientState::Started => {}
            _ => return None,
        }

        let s = BigNumber::from_bytes_be(salt);
        let big_b = BigNumber::from_bytes_be(host_public);

        if (&big_b % &self.group.n).is_zero() {
            tracing::warn!(
                "[{}] host public ephemeral is a multiple of N, aborting",
                self.identity
            );
            self.state = ClientState::SafetyFailed;
            return None;
        }

        let u = derive::scrambler(self.alg, self.cfg, &self.group, &self.big_a, &big_b);
        if u.is_zero() {
            tracing::warn!("[{}] scrambling parameter is zero, aborting", self.identity);
            self.state = ClientState::SafetyFailed;
            return None;
        }

        // x from the salt as it circulates: the integer image of the bytes
        let x = derive::private_key(
            self.alg,
            self.cfg,
            &s.to_bytes_be(),
            &self.identity,
            &self.password,
        );
        let v = self.group.g.mod_exp(&x, &self.group.n);

        // S = (B - k*v)^(a + u*x) mod N, the subtraction taken mod N
        let k_times_v = &self.k * &v;
        let base = big_b.mod_sub(&k_times_v, &self.group.n);
        let u_times_x = &u * &x;
        let exponent = &self.a + &u_times_x;
        let big_s = base.mod_exp(&exponent, &self.group.n);

        let key = derive::session_key(self.alg, &big_s);
        let proof = derive::client_proof(
            self.alg,
            self.cfg,
            &self.group,
            &self.identity,
            &s,
            &self.big_a,
            &big_b,
            &key,
        );
        let host_proof = derive::host_proof(self.alg, &self.big_a, &proof, &key);

        tracing::debug!("[{}] challenge processed, proof ready", self.identity);

        self.state = ClientState::Responded;
        self.session = Some(ClientSession { key, host_proof });
        Some(proof)
    }

    /// Check the host's proof of the shared key. A match releases the
    /// session key; a mismatch rejects the session for good.
    pub fn verify_session(&mut self, host_proof: &[u8]) -> bool {
        let session = match &self.session {
            Some(session) => session,
            None => return false,
        };
        match self.state {
            ClientState::Responded | ClientState::Authenticated => {}
            _ => return false,
        }
        if bool::from(session.host_proof.as_slice().ct_eq(host_proof)) {
            if self.state == ClientState::Responded {
                tracing::debug!("[{}] host proof verified, session authenticated", self.identity);
            }
            self.state = ClientState::Authenticated;
            true
        } else {
            if self.state == ClientState::Responded {
                tracing::warn!("[{}] host proof mismatch, rejecting session", self.identity);
                self.state = ClientState::Rejected;
            }
            false
        }
    }

    /// K, released only once the host has proven itself
    pub fn get_session_key(&self) -> Option<&[u8]> {
        match self.state {
            ClientState::Authenticated => {
                self.session.as_ref().map(|session| session.key.as_slice())
            }
            _ => None,
        }
    }

    /// Minimal encoding of the private ephemeral a
    pub fn get_ephemeral_secret(&self) -> Vec<u8> {
        self.a.to_bytes_be()
    }

    pub fn get_identity(&self) -> &str {
        &self.identity
    }

    pub fn authenticated(&self) -> bool {
        self.state == ClientState::Authenticated
    }

    pub fn state(&self) -> ClientState {
        self.state
    }
}
