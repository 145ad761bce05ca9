use std::path::Path;

use ledger_core::{Coin, CoinId, LedgerError, PubKeyHex, TaxRecord, TransactionRecord, TxHash};

const LATEST_TAX_KEY: &[u8] = b"latestTax";

/// Byte key-value store backing the ledger, backed by sled (pure-Rust, no
/// C/LLVM dependency). Named trees mirror the key families of the state
/// model: `coin:<uuid>`, `owner:<pubhex>`, `transaction:<hashhex>`,
/// `latestTax`.
pub struct StateDb {
    _db: sled::Db,
    coins: sled::Tree,
    owners: sled::Tree,
    transactions: sled::Tree,
    meta: sled::Tree,
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let db = sled::open(path).map_err(|e| LedgerError::Server(e.to_string()))?;
        let coins = db
            .open_tree("coins")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let owners = db
            .open_tree("owners")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let transactions = db
            .open_tree("transactions")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let meta = db
            .open_tree("meta")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(Self {
            _db: db,
            coins,
            owners,
            transactions,
            meta,
        })
    }

    /// Open a temporary, non-persistent database — used by tests and by
    /// any caller that only needs a fresh state machine for one run.
    pub fn open_temporary() -> Result<Self, LedgerError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let coins = db
            .open_tree("coins")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let owners = db
            .open_tree("owners")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let transactions = db
            .open_tree("transactions")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        let meta = db
            .open_tree("meta")
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(Self {
            _db: db,
            coins,
            owners,
            transactions,
            meta,
        })
    }

    // ── Coins ────────────────────────────────────────────────────────────────

    pub fn get_coin(&self, id: &CoinId) -> Result<Option<Coin>, LedgerError> {
        match self
            .coins
            .get(id.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?
        {
            Some(bytes) => {
                let coin = bincode::deserialize(&bytes)
                    .map_err(|e| LedgerError::Server(e.to_string()))?;
                Ok(Some(coin))
            }
            None => Ok(None),
        }
    }

    pub fn coin_exists(&self, id: &CoinId) -> bool {
        self.coins.contains_key(id.as_str().as_bytes()).unwrap_or(false)
    }

    pub fn owner_exists(&self, owner: &PubKeyHex) -> bool {
        self.owners
            .contains_key(owner.as_str().as_bytes())
            .unwrap_or(false)
    }

    /// Insert a brand-new coin and its owner index entry. Fails if either
    /// the coin id or the owner key is already present.
    pub fn add_coin(&self, coin: &Coin) -> Result<(), LedgerError> {
        if self.coin_exists(&coin.id) {
            return Err(LedgerError::CoinAlreadyExists(coin.id.clone()));
        }
        if self.owner_exists(&coin.owner) {
            return Err(LedgerError::OwnerAlreadyExists(coin.owner.clone()));
        }
        let bytes = bincode::serialize(coin).map_err(|e| LedgerError::Server(e.to_string()))?;
        self.coins
            .insert(coin.id.as_str().as_bytes(), bytes)
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        self.owners
            .insert(coin.owner.as_str().as_bytes(), coin.id.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(())
    }

    pub fn get_owner(&self, owner: &PubKeyHex) -> Result<Option<CoinId>, LedgerError> {
        match self
            .owners
            .get(owner.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?
        {
            Some(bytes) => {
                let id = String::from_utf8(bytes.to_vec())
                    .map_err(|e| LedgerError::Server(e.to_string()))?;
                Ok(Some(CoinId(id)))
            }
            None => Ok(None),
        }
    }

    pub fn delete_owner(&self, owner: &PubKeyHex) -> Result<(), LedgerError> {
        self.owners
            .remove(owner.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(())
    }

    pub fn delete_coin_and_owner(&self, coin: &Coin) -> Result<(), LedgerError> {
        self.coins
            .remove(coin.id.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        self.delete_owner(&coin.owner)?;
        Ok(())
    }

    /// Rewrite a coin's owner in place: updates the coin record and the
    /// owner index atomically from the caller's point of view (no other
    /// writer can observe the state in between — the engine is single
    /// writer).
    pub fn set_new_owner(&self, coin_id: &CoinId, new_owner: &PubKeyHex) -> Result<(), LedgerError> {
        let mut coin = self
            .get_coin(coin_id)?
            .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
        self.delete_owner(&coin.owner)?;
        coin.owner = new_owner.clone();
        let bytes = bincode::serialize(&coin).map_err(|e| LedgerError::Server(e.to_string()))?;
        self.coins
            .insert(coin_id.as_str().as_bytes(), bytes)
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        self.owners
            .insert(new_owner.as_str().as_bytes(), coin_id.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(())
    }

    pub fn is_coin_locked(&self, coin_id: &CoinId) -> Result<bool, LedgerError> {
        Ok(self
            .get_coin(coin_id)?
            .map(|c| c.locked)
            .unwrap_or(false))
    }

    fn set_locked(&self, coin_id: &CoinId, locked: bool) -> Result<(), LedgerError> {
        let mut coin = self
            .get_coin(coin_id)?
            .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
        coin.locked = locked;
        let bytes = bincode::serialize(&coin).map_err(|e| LedgerError::Server(e.to_string()))?;
        self.coins
            .insert(coin_id.as_str().as_bytes(), bytes)
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(())
    }

    pub fn lock_coin(&self, coin_id: &CoinId) -> Result<(), LedgerError> {
        self.set_locked(coin_id, true)
    }

    pub fn unlock_coin(&self, coin_id: &CoinId) -> Result<(), LedgerError> {
        self.set_locked(coin_id, false)
    }

    // ── Transactions ─────────────────────────────────────────────────────────

    pub fn transaction_exists(&self, hash: &TxHash) -> bool {
        self.transactions
            .contains_key(hash.as_str().as_bytes())
            .unwrap_or(false)
    }

    pub fn add_transaction(&self, hash: &TxHash, record: &TransactionRecord) -> Result<(), LedgerError> {
        let bytes = bincode::serialize(record).map_err(|e| LedgerError::Server(e.to_string()))?;
        self.transactions
            .insert(hash.as_str().as_bytes(), bytes)
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(())
    }

    pub fn get_transaction(&self, hash: &TxHash) -> Result<Option<TransactionRecord>, LedgerError> {
        match self
            .transactions
            .get(hash.as_str().as_bytes())
            .map_err(|e| LedgerError::Server(e.to_string()))?
        {
            Some(bytes) => {
                let record = bincode::deserialize(&bytes)
                    .map_err(|e| LedgerError::Server(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn put_transaction(&self, hash: &TxHash, record: &TransactionRecord) -> Result<(), LedgerError> {
        self.add_transaction(hash, record)
    }

    pub fn mark_coins_received(&self, hash: &TxHash) -> Result<(), LedgerError> {
        let mut record = self
            .get_transaction(hash)?
            .ok_or_else(|| LedgerError::TransactionNotFound(hash.clone()))?;
        record.coins_received = true;
        self.put_transaction(hash, &record)
    }

    pub fn mark_fee_received(&self, hash: &TxHash) -> Result<(), LedgerError> {
        let mut record = self
            .get_transaction(hash)?
            .ok_or_else(|| LedgerError::TransactionNotFound(hash.clone()))?;
        record.fee_received = true;
        self.put_transaction(hash, &record)
    }

    /// All transactions, ordered ascending by the stored key (sled trees
    /// are backed by a B-tree, so this iteration order is the key's byte
    /// order — which is the hex string's lexicographic order here).
    pub fn iter_transactions(&self) -> Result<Vec<(TxHash, TransactionRecord)>, LedgerError> {
        let mut out = Vec::new();
        for item in self.transactions.iter() {
            let (key, bytes) = item.map_err(|e| LedgerError::Server(e.to_string()))?;
            let hash = TxHash(
                String::from_utf8(key.to_vec()).map_err(|e| LedgerError::Server(e.to_string()))?,
            );
            let record: TransactionRecord =
                bincode::deserialize(&bytes).map_err(|e| LedgerError::Server(e.to_string()))?;
            out.push((hash, record));
        }
        Ok(out)
    }

    // ── Tax ──────────────────────────────────────────────────────────────────

    pub fn get_tax(&self) -> Result<Option<TaxRecord>, LedgerError> {
        match self
            .meta
            .get(LATEST_TAX_KEY)
            .map_err(|e| LedgerError::Server(e.to_string()))?
        {
            Some(bytes) => {
                let tax =
                    bincode::deserialize(&bytes).map_err(|e| LedgerError::Server(e.to_string()))?;
                Ok(Some(tax))
            }
            None => Ok(None),
        }
    }

    pub fn set_tax(&self, tax: &TaxRecord) -> Result<(), LedgerError> {
        let bytes = bincode::serialize(tax).map_err(|e| LedgerError::Server(e.to_string()))?;
        self.meta
            .insert(LATEST_TAX_KEY, bytes)
            .map_err(|e| LedgerError::Server(e.to_string()))?;
        Ok(())
    }
}
