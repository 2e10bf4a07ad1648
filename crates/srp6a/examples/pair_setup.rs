// Pair-setup demo - enrollment plus the full four-message exchange
//
// An accessory is provisioned with a salted verifier for its setup code,
// then a controller that knows the code authenticates against it. The two
// roles run on their own threads and talk through channels; every value
// that would cross a real transport is printed as hex.
//
// Exits nonzero if either side fails to authenticate.

use std::sync::mpsc;
use std::thread;

use data_encoding::HEXUPPER;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use srp6a::{HashAlg, NgType, SrpClient, SrpConfig, SrpServer, create_salted_verification_key};

/// SRP identity fixed by the pair-setup profile
const IDENTITY: &str = "Pair-Setup";

/// Setup code the accessory was labeled with
const SETUP_CODE: &str = "111-22-333";

/// 3072-bit MODP modulus used for pair-setup; not one of the four
/// registry strengths, so it travels as a custom group
const N_3072_HEX: &str =
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
     020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
     4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
     EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
     98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
     9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
     E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
     3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
     A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
     ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
     D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
     08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A93AD2CAFFFFFFFFFFFFFFFF";
const G_3072_HEX: &str = "5";

/// Salt width the provisioning profile expects
const SALT_LEN: usize = 16;

/// Controller -> accessory messages
#[derive(Debug)]
enum ControllerMessage {
    /// Message 1: identity and public ephemeral A
    Start { identity: String, public_a: Vec<u8> },
    /// Message 3: proof M
    Proof(Vec<u8>),
}

/// Accessory -> controller messages
#[derive(Debug)]
enum AccessoryMessage {
    /// Message 2: (salt, B); None means a safety check refused the exchange
    Challenge(Option<(Vec<u8>, Vec<u8>)>),
    /// Message 4: H_AMK; None means the proof was rejected
    ProofResponse(Option<Vec<u8>>),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(fmt::layer().with_target(false))
        .init();

    let cfg = SrpConfig::default();

    // Enrollment, normally done once on the factory line. The salt and
    // verifier lose leading zero bytes to the integer round-trip, so keep
    // drawing until both come out full width.
    let (salt, verifier) = loop {
        let (salt, verifier) = create_salted_verification_key(
            IDENTITY,
            SETUP_CODE,
            HashAlg::Sha512,
            NgType::NgCustom,
            Some(N_3072_HEX),
            Some(G_3072_HEX),
            SALT_LEN,
            None,
            cfg,
        )?;
        if salt.len() == SALT_LEN && verifier.len() == 384 {
            break (salt, verifier);
        }
    };
    println!("[factory]    salt     = {}", HEXUPPER.encode(&salt));
    println!("[factory]    verifier = {}", HEXUPPER.encode(&verifier));

    let (to_accessory, accessory_inbox) = mpsc::channel::<ControllerMessage>();
    let (to_controller, controller_inbox) = mpsc::channel::<AccessoryMessage>();

    // The accessory holds (salt, verifier) and never sees the setup code
    let accessory = thread::spawn(move || -> anyhow::Result<Vec<u8>> {
        let (identity, public_a) = match accessory_inbox.recv()? {
            ControllerMessage::Start { identity, public_a } => (identity, public_a),
            other => anyhow::bail!("unexpected message {:?}", other),
        };

        let mut host = SrpServer::new(
            &identity,
            &salt,
            &verifier,
            &public_a,
            HashAlg::Sha512,
            NgType::NgCustom,
            Some(N_3072_HEX),
            Some(G_3072_HEX),
            None,
            cfg,
        )?;

        let challenge = host.get_challenge();
        match &challenge {
            Some((s, b_pub)) => {
                println!("[accessory]  salt     = {}", HEXUPPER.encode(s));
                println!("[accessory]  B        = {}", HEXUPPER.encode(b_pub));
            }
            None => println!("[accessory]  refusing challenge"),
        }
        let refused = challenge.is_none();
        to_controller.send(AccessoryMessage::Challenge(challenge))?;
        if refused {
            anyhow::bail!("safety check refused the exchange");
        }

        let proof = match accessory_inbox.recv()? {
            ControllerMessage::Proof(m) => m,
            other => anyhow::bail!("unexpected message {:?}", other),
        };
        let response = host.verify_session(&proof).map(|h_amk| h_amk.to_vec());
        match &response {
            Some(h_amk) => println!("[accessory]  H_AMK    = {}", HEXUPPER.encode(h_amk)),
            None => println!("[accessory]  proof rejected"),
        }
        let accepted = response.is_some();
        to_controller.send(AccessoryMessage::ProofResponse(response))?;
        if !accepted {
            anyhow::bail!("controller proof rejected");
        }

        Ok(host
            .get_session_key()
            .expect("authenticated session has a key")
            .to_vec())
    });

    // The controller knows only the identity and the setup code
    let controller = thread::spawn(move || -> anyhow::Result<Vec<u8>> {
        let mut user = SrpClient::new(
            IDENTITY,
            SETUP_CODE,
            HashAlg::Sha512,
            NgType::NgCustom,
            Some(N_3072_HEX),
            Some(G_3072_HEX),
            None,
            cfg,
        )?;

        let (identity, public_a) = user.start_authentication();
        println!("[controller] I        = {}", identity);
        println!("[controller] A        = {}", HEXUPPER.encode(&public_a));
        to_accessory.send(ControllerMessage::Start { identity, public_a })?;

        let (challenge_salt, public_b) = match controller_inbox.recv()? {
            AccessoryMessage::Challenge(Some(challenge)) => challenge,
            AccessoryMessage::Challenge(None) => {
                anyhow::bail!("accessory refused the exchange")
            }
            other => anyhow::bail!("unexpected message {:?}", other),
        };

        let proof = user
            .process_challenge(&challenge_salt, &public_b)
            .ok_or_else(|| anyhow::anyhow!("challenge failed the safety checks"))?;
        println!("[controller] M        = {}", HEXUPPER.encode(&proof));
        to_accessory.send(ControllerMessage::Proof(proof))?;

        let host_proof = match controller_inbox.recv()? {
            AccessoryMessage::ProofResponse(Some(h_amk)) => h_amk,
            AccessoryMessage::ProofResponse(None) => {
                anyhow::bail!("accessory rejected the proof")
            }
            other => anyhow::bail!("unexpected message {:?}", other),
        };
        if !user.verify_session(&host_proof) {
            anyhow::bail!("accessory proof did not verify");
        }

        Ok(user
            .get_session_key()
            .expect("authenticated session has a key")
            .to_vec())
    });

    let accessory_key = accessory.join().expect("accessory thread panicked")?;
    let controller_key = controller.join().expect("controller thread panicked")?;
    anyhow::ensure!(
        accessory_key == controller_key,
        "session keys diverged between the two sides"
    );
    println!("[done]       K        = {}", HEXUPPER.encode(&accessory_key));

    Ok(())
}
