use crate::{Error, Id, PublicKey, Signature};
use bech32::{Bech32, Hrp};
use rand_core::OsRng;

/// This is a private key which is to be kept secret and is used to prove identity
#[allow(missing_debug_implementations)]
pub struct PrivateKey(secp256k1::SecretKey);

impl PrivateKey {
    /// Generate a new `PrivateKey` (which can be used to get the `PublicKey`)
    pub fn generate() -> PrivateKey {
        let secret_key = secp256k1::SecretKey::new(&mut OsRng);
        PrivateKey(secret_key)
    }

    /// Get the PublicKey matching this PrivateKey
    pub fn public_key(&self) -> PublicKey {
        let (xopk, _parity) = self.0.x_only_public_key(secp256k1::SECP256K1);
        PublicKey(xopk)
    }

    /// Render into a hexadecimal string
    pub fn as_hex_string(&self) -> String {
        hex::encode(self.0.secret_bytes())
    }

    /// Create from a hexadecimal string
    pub fn try_from_hex_string(v: &str) -> Result<PrivateKey, Error> {
        let vec: Vec<u8> = hex::decode(v)?;
        Ok(PrivateKey(secp256k1::SecretKey::from_slice(&vec)?))
    }

    /// Export as a bech32 encoded string
    pub fn as_bech32_string(&self) -> Result<String, Error> {
        let hrp = Hrp::parse("nsec")?;
        Ok(bech32::encode::<Bech32>(
            hrp,
            self.0.secret_bytes().as_slice(),
        )?)
    }

    /// Import from a bech32 encoded string
    pub fn try_from_bech32_string(s: &str) -> Result<PrivateKey, Error> {
        let (hrp, data) = bech32::decode(s)?;
        if hrp.as_str() != "nsec" {
            Err(Error::WrongBech32(
                "nsec".to_string(),
                hrp.as_str().to_string(),
            ))
        } else {
            Ok(PrivateKey(secp256k1::SecretKey::from_slice(&data)?))
        }
    }

    /// Import from either a hex or a bech32 nsec encoded string
    pub fn try_from_str(s: &str) -> Result<PrivateKey, Error> {
        if s.starts_with("nsec") {
            PrivateKey::try_from_bech32_string(s)
        } else {
            PrivateKey::try_from_hex_string(s)
        }
    }

    /// Sign a 32-byte hash.
    ///
    /// Signed without auxiliary randomness so identical inputs always
    /// reproduce the same signature.
    pub fn sign_id(&self, id: Id) -> Result<Signature, Error> {
        let keypair = secp256k1::Keypair::from_secret_key(secp256k1::SECP256K1, &self.0);
        let message = secp256k1::Message::from_digest_slice(id.0.as_slice())?;
        Ok(Signature(
            secp256k1::SECP256K1.sign_schnorr_no_aux_rand(&message, &keypair),
        ))
    }

    // Mock data for testing
    #[allow(dead_code)]
    pub(crate) fn mock() -> PrivateKey {
        PrivateKey::generate()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.0.non_secure_erase();
    }
}

/// A signing keypair, derived once at startup and held for the process lifetime
#[allow(missing_debug_implementations)]
pub struct KeyPair {
    /// The secret half
    pub privkey: PrivateKey,

    /// The public half, derived from `privkey`
    pub pubkey: PublicKey,
}

impl KeyPair {
    /// Derive a keypair from a private key
    pub fn from_private_key(privkey: PrivateKey) -> KeyPair {
        let pubkey = privkey.public_key();
        KeyPair { privkey, pubkey }
    }
}
