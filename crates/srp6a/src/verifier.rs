// Verifier generation - the enrollment half of the protocol
// The host stores (salt, verifier) and never sees the password again

use crate::SrpConfig;
use crate::big_number::BigNumber;
use crate::crypto_hash::HashAlg;
use crate::derive;
use crate::errors::SrpError;
use crate::groups::{NgType, resolve_group};

/// Generate the enrollment pair (salt, verifier), both minimal encodings.
///
/// v = g^x mod N with x = H(s || H(I ":" p)).
///
/// Without a supplied salt, `salt_len` random bytes are drawn and the salt
/// becomes the minimal encoding of their integer value, so leading zero
/// bytes do not survive; store what is returned. A supplied salt is fed to
/// x exactly as given.
#[allow(clippy::too_many_arguments)]
pub fn create_salted_verification_key(
    identity: &str,
    password: &str,
    alg: HashAlg,
    ng: NgType,
    n_hex: Option<&str>,
    g_hex: Option<&str>,
    salt_len: usize,
    salt: Option<&[u8]>,
    cfg: SrpConfig,
) -> Result<(Vec<u8>, Vec<u8>), SrpError> {
    let group = resolve_group(ng, n_hex, g_hex)?;

    let salt_bytes = match salt {
        Some(bytes) => bytes.to_vec(),
        None => BigNumber::random(salt_len).to_bytes_be(),
    };

    let x = derive::private_key(alg, cfg, &salt_bytes, identity, password);
    let v = group.g.mod_exp(&x, &group.n);

    tracing::debug!("[{}] verifier generated", identity);

    Ok((salt_bytes, v.to_bytes_be()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::HEXUPPER;

    #[test]
    fn test_deterministic_given_salt() {
        let salt = [5u8; 16];
        let (s1, v1) = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            16,
            Some(&salt),
            SrpConfig::default(),
        )
        .unwrap();
        let (s2, v2) = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            16,
            Some(&salt),
            SrpConfig::default(),
        )
        .unwrap();
        assert_eq!(s1, s2);
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_different_salts_give_different_verifiers() {
        let (_, v1) = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            16,
            Some(&[1u8; 16]),
            SrpConfig::default(),
        )
        .unwrap();
        let (_, v2) = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha256,
            NgType::Ng2048,
            None,
            None,
            16,
            Some(&[2u8; 16]),
            SrpConfig::default(),
        )
        .unwrap();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_random_salt_respects_length() {
        let (salt, verifier) = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha1,
            NgType::Ng1024,
            None,
            None,
            16,
            None,
            SrpConfig::default(),
        )
        .unwrap();
        assert!(salt.len() <= 16);
        assert!(!verifier.is_empty());
    }

    #[test]
    fn test_verifier_matches_rfc5054_vector() {
        let salt = HEXUPPER
            .decode(b"BEB25379D1A8581EB5A727673A2441EE")
            .unwrap();
        let (_, v) = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha1,
            NgType::Ng1024,
            None,
            None,
            16,
            Some(&salt),
            SrpConfig::default(),
        )
        .unwrap();
        let expected = "7E273DE8696FFC4F4E337D05B4B375BEB0DDE1569E8FA00A9886D8129BADA1F1\
                        822223CA1A605B530E379BA4729FDC59F105B4787E5186F5C671085A1447B52A\
                        48CF1970B4FB6F8400BBF4CEBFBB168152E08AB5EA53D15C1AFF87B2B9DA6E04\
                        E058AD51CC72BFC9033B564E26480D78E955A5E29E7AB245DB2BE315E2099AFB";
        assert_eq!(HEXUPPER.encode(&v), expected);
    }

    #[test]
    fn test_custom_group_requires_both_values() {
        let err = create_salted_verification_key(
            "alice",
            "password123",
            HashAlg::Sha512,
            NgType::NgCustom,
            Some("FF"),
            None,
            16,
            None,
            SrpConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SrpError::MissingCustomGroup);
    }
}
