//! Generate a fresh nostr keypair for cln-zapd, printed in hex and bech32.

use cln_zapd::{Error, PrivateKey};

fn main() -> Result<(), Error> {
    let privkey = PrivateKey::generate();
    let pubkey = privkey.public_key();
    println!("public:  {}", pubkey.as_hex_string());
    println!("         {}", pubkey.try_as_bech32_string()?);
    println!("private: {}", privkey.as_hex_string());
    println!("         {}", privkey.as_bech32_string()?);
    Ok(())
}
