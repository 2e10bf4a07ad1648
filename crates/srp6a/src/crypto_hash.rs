// CryptoHash - selectable-strength SHA wrappers
// All protocol hashing funnels through hash_parts so the width-padding
// rule is applied in exactly one place

use digest::Digest;

use crate::SrpConfig;
use crate::big_number::BigNumber;

/// Hash strength selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlg {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    /// Digest size in bytes
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlg::Sha1 => 20,
            HashAlg::Sha224 => 28,
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
            HashAlg::Sha512 => 64,
        }
    }
}

/// Streaming hasher over the selected strength
#[derive(Clone)]
pub enum Hasher {
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
}

impl Hasher {
    pub fn new(alg: HashAlg) -> Self {
        match alg {
            HashAlg::Sha1 => Hasher::Sha1(sha1::Sha1::new()),
            HashAlg::Sha224 => Hasher::Sha224(sha2::Sha224::new()),
            HashAlg::Sha256 => Hasher::Sha256(sha2::Sha256::new()),
            HashAlg::Sha384 => Hasher::Sha384(sha2::Sha384::new()),
            HashAlg::Sha512 => Hasher::Sha512(sha2::Sha512::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha224(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha384(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Sha1(h) => h.finalize().to_vec(),
            Hasher::Sha224(h) => h.finalize().to_vec(),
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha384(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// One input to the width-aware hash
pub enum HashPart<'a> {
    Bytes(&'a [u8]),
    Number(&'a BigNumber),
}

/// Digest a single byte string
pub fn hash_bytes(alg: HashAlg, data: &[u8]) -> Vec<u8> {
    let mut h = Hasher::new(alg);
    h.update(data);
    h.finalize()
}

/// H(...) over a part list. Integer parts use the minimal encoding. When
/// `cfg.rfc5054_padding` is set and a width is given, every part is
/// left-padded with zero bytes to `width` before being fed to the digest.
pub fn hash_parts(
    alg: HashAlg,
    cfg: SrpConfig,
    width: Option<usize>,
    parts: &[HashPart<'_>],
) -> Vec<u8> {
    let mut h = Hasher::new(alg);
    for part in parts {
        let owned;
        let data: &[u8] = match part {
            HashPart::Bytes(bytes) => bytes,
            HashPart::Number(n) => {
                owned = n.to_bytes_be();
                &owned
            }
        };
        if cfg.rfc5054_padding {
            if let Some(width) = width {
                h.update(&vec![0u8; width.saturating_sub(data.len())]);
            }
        }
        h.update(data);
    }
    h.finalize()
}

/// Integer image of H(...): the digest bytes read as a big-endian integer
pub fn hash_parts_to_int(
    alg: HashAlg,
    cfg: SrpConfig,
    width: Option<usize>,
    parts: &[HashPart<'_>],
) -> BigNumber {
    BigNumber::from_bytes_be(&hash_parts(alg, cfg, width, parts))
}

/// H(N) XOR H(g) over minimal encodings; in padding mode g's encoding is
/// first left-padded to N's length
pub fn hn_xor_hg(alg: HashAlg, cfg: SrpConfig, n: &BigNumber, g: &BigNumber) -> Vec<u8> {
    let bin_n = n.to_bytes_be();
    let bin_g = g.to_bytes_be();

    let padding = if cfg.rfc5054_padding {
        bin_n.len().saturating_sub(bin_g.len())
    } else {
        0
    };

    let hn = hash_bytes(alg, &bin_n);
    let mut padded_g = vec![0u8; padding];
    padded_g.extend_from_slice(&bin_g);
    let hg = hash_bytes(alg, &padded_g);

    hn.iter().zip(hg.iter()).map(|(a, b)| a ^ b).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::HEXLOWER;

    #[test]
    fn test_digest_lengths() {
        for alg in [
            HashAlg::Sha1,
            HashAlg::Sha224,
            HashAlg::Sha256,
            HashAlg::Sha384,
            HashAlg::Sha512,
        ] {
            assert_eq!(hash_bytes(alg, b"test").len(), alg.digest_len());
        }
    }

    #[test]
    fn test_sha1_known_digest() {
        assert_eq!(
            HEXLOWER.encode(&hash_bytes(HashAlg::Sha1, b"test")),
            "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3"
        );
    }

    #[test]
    fn test_sha256_known_digest() {
        assert_eq!(
            HEXLOWER.encode(&hash_bytes(HashAlg::Sha256, b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha512_known_digest() {
        assert_eq!(
            HEXLOWER.encode(&hash_bytes(HashAlg::Sha512, b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_width_padding_only_when_enabled() {
        let n = BigNumber::from_u32(0x0102);
        let plain = hash_parts(
            HashAlg::Sha256,
            SrpConfig::default(),
            Some(4),
            &[HashPart::Number(&n)],
        );
        assert_eq!(plain, hash_bytes(HashAlg::Sha256, &[1, 2]));

        let cfg = SrpConfig {
            rfc5054_padding: true,
            ..Default::default()
        };
        let padded = hash_parts(HashAlg::Sha256, cfg, Some(4), &[HashPart::Number(&n)]);
        assert_eq!(padded, hash_bytes(HashAlg::Sha256, &[0, 0, 1, 2]));
    }

    #[test]
    fn test_no_width_means_no_padding() {
        let n = BigNumber::from_u32(0x0102);
        let cfg = SrpConfig {
            rfc5054_padding: true,
            ..Default::default()
        };
        let unpadded = hash_parts(HashAlg::Sha256, cfg, None, &[HashPart::Number(&n)]);
        assert_eq!(unpadded, hash_bytes(HashAlg::Sha256, &[1, 2]));
    }

    #[test]
    fn test_hash_parts_concatenates() {
        let n = BigNumber::from_u32(0x03);
        let joined = hash_parts(
            HashAlg::Sha1,
            SrpConfig::default(),
            None,
            &[HashPart::Bytes(&[1, 2]), HashPart::Number(&n)],
        );
        assert_eq!(joined, hash_bytes(HashAlg::Sha1, &[1, 2, 3]));
    }

    #[test]
    fn test_hn_xor_hg_self_cancels() {
        let n = BigNumber::from_u32(7);
        let xored = hn_xor_hg(HashAlg::Sha1, SrpConfig::default(), &n, &n);
        assert_eq!(xored, vec![0u8; 20]);
    }

    #[test]
    fn test_hn_xor_hg_padding_changes_g_hash() {
        let n = BigNumber::from_u32(0x010203);
        let g = BigNumber::from_u32(5);
        let plain = hn_xor_hg(HashAlg::Sha256, SrpConfig::default(), &n, &g);
        let cfg = SrpConfig {
            rfc5054_padding: true,
            ..Default::default()
        };
        let padded = hn_xor_hg(HashAlg::Sha256, cfg, &n, &g);
        assert_eq!(plain.len(), 32);
        assert_ne!(plain, padded);
    }
}
