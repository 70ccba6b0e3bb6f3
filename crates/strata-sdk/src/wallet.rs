//! Signing keys

use bytes::Bytes;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use strata_crypto::{public_key_to_address, sign, PrivateKey, PublicKey, Signature};
use strata_primitives::{Address, H256};
use strata_types::Transaction;
use zeroize::Zeroize;

use crate::SdkError;

/// Something that can sign transactions for an account
pub trait Signer: Send + Sync {
    /// Account the signatures belong to
    fn address(&self) -> Address;

    /// Sign the transaction id and attach the signature
    fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, SdkError>;
}

/// Software wallet holding one secp256k1 key
///
/// Note: Clone is intentionally not implemented to prevent accidental key duplication.
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
}

impl Wallet {
    /// Create a new random wallet
    pub fn new_random() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Create a wallet from a 32-byte private key
    pub fn from_private_key(key: &[u8; 32]) -> Result<Self, SdkError> {
        let private_key =
            SigningKey::from_slice(key).map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_signing_key(private_key))
    }

    /// Create a wallet from a hex-encoded private key
    ///
    /// Accepts both with and without "0x" prefix.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, SdkError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = hex::decode(hex).map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;
        if bytes.len() != 32 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(SdkError::InvalidPrivateKey(format!(
                "Expected 32 bytes, got {}",
                len
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        bytes.zeroize();

        let result = Self::from_private_key(&key);
        key.zeroize();
        result
    }

    fn from_signing_key(private_key: PrivateKey) -> Self {
        let address = public_key_to_address(private_key.verifying_key());
        Self {
            private_key,
            address,
        }
    }

    /// Get the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the wallet's public key
    pub fn public_key(&self) -> &PublicKey {
        self.private_key.verifying_key()
    }

    /// Sign a 32-byte digest
    pub fn sign_hash(&self, hash: &H256) -> Result<Signature, SdkError> {
        sign(hash, &self.private_key).map_err(|e| SdkError::SigningFailed(e.to_string()))
    }
}

impl Signer for Wallet {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, SdkError> {
        let signature = self.sign_hash(&tx.txid())?;
        tx.signatures
            .push(Bytes::copy_from_slice(&signature.to_bytes()));
        Ok(tx)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
