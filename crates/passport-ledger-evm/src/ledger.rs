//! Ledger implementation over the deployed ReputationPassport contract.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{Abi, AbiError};
use ethers::contract::{Contract, ContractError};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, U256};
use ethers::utils::to_checksum;
use passport_core::Digest;
use passport_ledger::{Ledger, LedgerEntry, LedgerError, LedgerWriter, RecordReceipt, Result};

use crate::config::{EvmLedgerConfig, Network};

/// JSON ABI of the ReputationPassport contract.
pub const PASSPORT_ABI_JSON: &str = include_str!("../abi/ReputationPassport.json");

/// Parse the bundled contract ABI.
pub fn passport_abi() -> Result<Abi> {
    serde_json::from_str(PASSPORT_ABI_JSON)
        .map_err(|e| LedgerError::NotConfigured(format!("contract ABI: {e}")))
}

/// Read-only contract ledger over HTTP.
pub type ReadOnlyLedger = EvmLedger<Provider<Http>>;

/// Provider plus local signing key, for issuance.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A ledger backed by the on-chain contract.
///
/// Reads work with any middleware. Writes need a middleware with a default
/// sender (a [`SignerMiddleware`]), and that sender must be the issuer.
pub struct EvmLedger<M> {
    contract: Contract<M>,
    client: Arc<M>,
}

impl EvmLedger<Provider<Http>> {
    /// Read-only ledger over HTTP.
    pub fn connect(config: &EvmLedgerConfig) -> Result<Self> {
        let provider = http_provider(&config.rpc_url)?;
        Self::new(config.contract_address, Arc::new(provider))
    }
}

impl EvmLedger<SignerClient> {
    /// Ledger over HTTP that signs writes with `private_key`.
    pub fn connect_with_signer(config: &EvmLedgerConfig, private_key: &str) -> Result<Self> {
        let provider = http_provider(&config.rpc_url)?;
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|_| LedgerError::InvalidIdentity("invalid signer private key".into()))?
            .with_chain_id(config.network.chain_id());

        Self::new(config.contract_address, Arc::new(SignerMiddleware::new(provider, wallet)))
    }

    /// Checksummed address of the signing wallet, the identity writes are made as.
    pub fn signer_identity(&self) -> String {
        to_checksum(&self.client.address(), None)
    }
}

impl<M: Middleware + 'static> EvmLedger<M> {
    /// Bind the contract at `address` to an existing client.
    pub fn new(address: Address, client: Arc<M>) -> Result<Self> {
        let contract = Contract::new(address, passport_abi()?, client.clone());
        Ok(Self { contract, client })
    }

    /// The contract address.
    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Whether the connected chain is one the contract is deployed to.
    pub async fn is_supported_network(&self) -> bool {
        match self.client.get_chainid().await {
            Ok(chain_id) => u64::try_from(chain_id)
                .ok()
                .and_then(Network::from_chain_id)
                .is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read chain id");
                false
            }
        }
    }

    async fn issuer_whitelisted(&self, issuer: Address) -> Result<bool> {
        self.contract
            .method::<_, bool>("issuers", issuer)
            .map_err(abi_error)?
            .call()
            .await
            .map_err(call_error)
    }

    async fn digest_recorded(&self, digest: &Digest) -> Result<bool> {
        self.contract
            .method::<_, bool>("credentialExists", H256::from(digest.0))
            .map_err(abi_error)?
            .call()
            .await
            .map_err(call_error)
    }
}

#[async_trait]
impl<M: Middleware + 'static> Ledger for EvmLedger<M> {
    async fn entry_exists(&self, digest: &Digest) -> Result<bool> {
        self.digest_recorded(digest).await
    }

    async fn get_entry(&self, digest: &Digest) -> Result<LedgerEntry> {
        let call = self
            .contract
            .method::<_, (H256, Address, U256, String)>("getCredential", H256::from(digest.0))
            .map_err(abi_error)?;

        let (hash, issuer, timestamp, category) = match call.call().await {
            Ok(decoded) => decoded,
            // The contract reverts on unknown digests.
            Err(e) if e.is_revert() => return Err(LedgerError::NotFound(*digest)),
            Err(e) => return Err(call_error(e)),
        };

        // A zeroed struct is how a mapping miss comes back.
        if issuer == Address::zero() {
            return Err(LedgerError::NotFound(*digest));
        }

        Ok(LedgerEntry {
            digest: Digest::from_bytes(hash.0),
            issuer: to_checksum(&issuer, None),
            category,
            timestamp: u64::try_from(timestamp).unwrap_or(u64::MAX),
        })
    }

    async fn is_authorized_issuer(&self, issuer: &str) -> Result<bool> {
        self.issuer_whitelisted(parse_address(issuer)?).await
    }

    async fn credentials_of(&self, owner: &str) -> Result<Vec<Digest>> {
        let hashes = self
            .contract
            .method::<_, Vec<H256>>("getCredentials", parse_address(owner)?)
            .map_err(abi_error)?
            .call()
            .await
            .map_err(call_error)?;

        Ok(hashes.into_iter().map(|h| Digest::from_bytes(h.0)).collect())
    }

    async fn credential_count(&self, owner: &str) -> Result<u64> {
        let count = self
            .contract
            .method::<_, U256>("getCredentialCount", parse_address(owner)?)
            .map_err(abi_error)?
            .call()
            .await
            .map_err(call_error)?;

        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl<M: Middleware + 'static> LedgerWriter for EvmLedger<M> {
    async fn record_credential(
        &self,
        issuer: &str,
        owner: &str,
        digest: &Digest,
        category: &str,
    ) -> Result<RecordReceipt> {
        let issuer_address = parse_address(issuer)?;
        let owner_address = parse_address(owner)?;

        let sender = self
            .client
            .default_sender()
            .ok_or_else(|| LedgerError::NotConfigured("no signer configured for writes".into()))?;
        if sender != issuer_address {
            return Err(LedgerError::InvalidIdentity(format!(
                "signer {} cannot record on behalf of {issuer}",
                to_checksum(&sender, None)
            )));
        }

        if !self.issuer_whitelisted(issuer_address).await? {
            return Err(LedgerError::UnauthorizedIssuer(issuer.to_string()));
        }
        if self.digest_recorded(digest).await? {
            return Err(LedgerError::AlreadyRecorded(*digest));
        }

        let call = self
            .contract
            .method::<_, ()>(
                "addCredential",
                (owner_address, H256::from(digest.0), category.to_string()),
            )
            .map_err(abi_error)?;

        let pending = call.send().await.map_err(call_error)?;
        let tx_hash = pending.tx_hash();
        tracing::info!(%digest, tx = ?tx_hash, "credential transaction submitted");

        let receipt = pending
            .await
            .map_err(|e| LedgerError::Unavailable(format!("waiting for confirmation: {e}")))?
            .ok_or_else(|| LedgerError::Rejected("transaction dropped from mempool".into()))?;

        if receipt.status == Some(0u64.into()) {
            return Err(LedgerError::Rejected(format!(
                "transaction {:?} reverted",
                receipt.transaction_hash
            )));
        }

        let block_number = receipt.block_number.map(|b| b.as_u64());
        tracing::info!(%digest, block = ?block_number, "credential transaction confirmed");

        Ok(RecordReceipt {
            digest: *digest,
            transaction: Some(format!("{:?}", receipt.transaction_hash)),
            block_number,
        })
    }
}

fn http_provider(rpc_url: &str) -> Result<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url)
        .map_err(|e| LedgerError::NotConfigured(format!("invalid rpc url {rpc_url}: {e}")))
}

fn parse_address(identity: &str) -> Result<Address> {
    identity
        .trim()
        .parse::<Address>()
        .map_err(|_| LedgerError::InvalidIdentity(identity.to_string()))
}

fn abi_error(e: AbiError) -> LedgerError {
    LedgerError::NotConfigured(format!("contract ABI: {e}"))
}

fn call_error<M: Middleware>(e: ContractError<M>) -> LedgerError {
    if e.is_revert() {
        LedgerError::Rejected(e.to_string())
    } else {
        LedgerError::Unavailable(e.to_string())
    }
}
