// Shared derivations both protocol roles call
// Byte framing is the contract here: which values are hashed minimal,
// which are width-padded, and which never see padding at all

use crate::SrpConfig;
use crate::big_number::BigNumber;
use crate::crypto_hash::{HashAlg, HashPart, Hasher, hash_bytes, hash_parts_to_int, hn_xor_hg};
use crate::groups::SrpGroup;

/// x = H(s || H(I ":" p)), never width-padded. Identity omission drops I
/// from the inner hash only; the separator stays.
pub(crate) fn private_key(
    alg: HashAlg,
    cfg: SrpConfig,
    salt: &[u8],
    identity: &str,
    password: &str,
) -> BigNumber {
    let mut inner = Hasher::new(alg);
    if !cfg.omit_identity_in_x {
        inner.update(identity.as_bytes());
    }
    inner.update(b":");
    inner.update(password.as_bytes());
    let inner = inner.finalize();

    let mut outer = Hasher::new(alg);
    outer.update(salt);
    outer.update(&inner);
    BigNumber::from_bytes_be(&outer.finalize())
}

/// k = H(N, g), components padded to the modulus width in padding mode
pub(crate) fn multiplier(alg: HashAlg, cfg: SrpConfig, group: &SrpGroup) -> BigNumber {
    hash_parts_to_int(
        alg,
        cfg,
        Some(group.n.num_bytes()),
        &[HashPart::Number(&group.n), HashPart::Number(&group.g)],
    )
}

/// u = H(A, B), components padded to the modulus width in padding mode
pub(crate) fn scrambler(
    alg: HashAlg,
    cfg: SrpConfig,
    group: &SrpGroup,
    big_a: &BigNumber,
    big_b: &BigNumber,
) -> BigNumber {
    hash_parts_to_int(
        alg,
        cfg,
        Some(group.n.num_bytes()),
        &[HashPart::Number(big_a), HashPart::Number(big_b)],
    )
}

/// K = H(S) over the minimal encoding of the premaster secret
pub(crate) fn session_key(alg: HashAlg, big_s: &BigNumber) -> Vec<u8> {
    hash_bytes(alg, &big_s.to_bytes_be())
}

/// M = H(H(N) xor H(g) || H(I) || s || A || B || K)
/// s, A and B enter minimal, whatever the padding mode says elsewhere
pub(crate) fn client_proof(
    alg: HashAlg,
    cfg: SrpConfig,
    group: &SrpGroup,
    identity: &str,
    s: &BigNumber,
    big_a: &BigNumber,
    big_b: &BigNumber,
    key: &[u8],
) -> Vec<u8> {
    let mut h = Hasher::new(alg);
    h.update(&hn_xor_hg(alg, cfg, &group.n, &group.g));
    h.update(&hash_bytes(alg, identity.as_bytes()));
    h.update(&s.to_bytes_be());
    h.update(&big_a.to_bytes_be());
    h.update(&big_b.to_bytes_be());
    h.update(key);
    h.finalize()
}

/// H_AMK = H(A || M || K)
pub(crate) fn host_proof(alg: HashAlg, big_a: &BigNumber, m: &[u8], key: &[u8]) -> Vec<u8> {
    let mut h = Hasher::new(alg);
    h.update(&big_a.to_bytes_be());
    h.update(m);
    h.update(key);
    h.finalize()
}
