//! Permission persistence
//!
//! `PermissionsClient` is the fetch/update boundary the editor talks to.
//! `PermissionStore` implements it over LMDB.
//!
//! Storage patterns:
//! - `dealer/user` → permissions JSON
//! - `dealer/user` → save revision

use std::path::Path;

use heed::types::{Str, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use tracing::{debug, info};

use crate::error::{err, PermissionsError, Result};
use crate::model::{PermissionPage, Permissions};

/// Fetch and update collaborators, keyed by dealer account and user name
pub trait PermissionsClient {
    fn fetch(&self, dealer: &str, user: &str) -> Result<Permissions>;
    fn update(&self, dealer: &str, user: &str, pages: &[PermissionPage]) -> Result<()>;
}

type DbU64 = Database<Str, U64<byteorder::BigEndian>>;

struct Dbs {
    permissions: Database<Str, Str>,
    revisions: DbU64,
}

/// Storage key for one user of one dealer account
#[inline]
pub fn key(dealer: &str, user: &str) -> String {
    format!("{}/{}", dealer, user)
}

pub struct PermissionStore {
    env: Env,
    dbs: Dbs,
}

impl PermissionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(err)?;
        // SAFETY: LMDB requires no other processes access this path concurrently during open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(1 << 28)
                .max_dbs(2)
                .open(path)
                .map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let dbs = Dbs {
            permissions: env.create_database(&mut tx, Some("permissions")).map_err(err)?,
            revisions: env.create_database(&mut tx, Some("revisions")).map_err(err)?,
        };
        tx.commit().map_err(err)?;
        info!(path = %path.display(), "permission store opened");
        Ok(Self { env, dbs })
    }

    fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        f(&self.dbs, &self.env.read_txn().map_err(err)?)
    }

    fn write<T, F: FnOnce(&Dbs, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut txn = self.env.write_txn().map_err(err)?;
        let r = f(&self.dbs, &mut txn)?;
        txn.commit().map_err(err)?;
        Ok(r)
    }

    /// Store a complete permission set, replacing any previous one
    pub fn put(&self, dealer: &str, user: &str, permissions: &Permissions) -> Result<()> {
        let json = serde_json::to_string(permissions)?;
        let k = key(dealer, user);
        self.write(|d, tx| {
            d.permissions.put(tx, &k, &json).map_err(err)?;
            bump(d, tx, &k)
        })
    }

    /// Number of writes recorded for this user, 0 if never stored
    pub fn revision(&self, dealer: &str, user: &str) -> Result<u64> {
        let k = key(dealer, user);
        self.read(|d, tx| Ok(d.revisions.get(tx, &k).map_err(err)?.unwrap_or(0)))
    }

    /// Users with stored permissions under a dealer account
    pub fn list_users(&self, dealer: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", dealer);
        self.read(|d, tx| {
            let mut r = Vec::new();
            for item in d.permissions.prefix_iter(tx, &prefix).map_err(err)? {
                let (k, _) = item.map_err(err)?;
                if let Some(user) = k.strip_prefix(&prefix) {
                    r.push(user.to_string());
                }
            }
            Ok(r)
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.write(|d, tx| {
            d.permissions.clear(tx).map_err(err)?;
            d.revisions.clear(tx).map_err(err)
        })
    }
}

fn bump(d: &Dbs, tx: &mut RwTxn, k: &str) -> Result<()> {
    let next = d.revisions.get(tx, k).map_err(err)?.unwrap_or(0) + 1;
    d.revisions.put(tx, k, &next).map_err(err)
}

impl PermissionsClient for PermissionStore {
    fn fetch(&self, dealer: &str, user: &str) -> Result<Permissions> {
        let k = key(dealer, user);
        let json = self.read(|d, tx| Ok(d.permissions.get(tx, &k).map_err(err)?.map(|s| s.to_string())))?;
        let json = json.ok_or_else(|| PermissionsError::NotFound { dealer: dealer.into(), user: user.into() })?;
        debug!(dealer, user, "permissions fetched");
        Ok(serde_json::from_str(&json)?)
    }

    /// Replace the stored pages, keeping the stored access categories
    fn update(&self, dealer: &str, user: &str, pages: &[PermissionPage]) -> Result<()> {
        let k = key(dealer, user);
        self.write(|d, tx| {
            let mut permissions: Permissions = match d.permissions.get(tx, &k).map_err(err)? {
                Some(json) => serde_json::from_str(json)?,
                None => Permissions::default(),
            };
            permissions.pages = pages.to_vec();
            let json = serde_json::to_string(&permissions)?;
            d.permissions.put(tx, &k, &json).map_err(err)?;
            bump(d, tx, &k)
        })?;
        info!(dealer, user, pages = pages.len(), "permissions updated");
        Ok(())
    }
}
