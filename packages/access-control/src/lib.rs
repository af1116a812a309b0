use std::ops::{Deref, DerefMut};

use sdk::{
    cosmwasm_std::{Addr, Storage},
    cw_storage_plus::Item,
};

pub use self::contract_owner::ContractOwnerAccess;
use self::error::{Error, Result};

mod contract_owner;
pub mod error;

pub fn check(permitted_to: &Addr, accessed_by: &Addr) -> Result {
    if permitted_to == accessed_by {
        Ok(())
    } else {
        Err(Error::Unauthorized {})
    }
}

/// A permission granted to exactly one address and kept in the contract storage
pub struct SingleUserAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage>,
{
    storage: S,
    storage_item: Item<Addr>,
}

impl<'storage, S> SingleUserAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage>,
{
    pub const fn new(storage: S, storage_namespace: &'static str) -> Self {
        Self {
            storage,
            storage_item: Item::new(storage_namespace),
        }
    }

    pub fn granted_to(&self) -> Result<Addr> {
        self.storage_item
            .load(self.storage.deref())
            .map_err(Into::into)
    }

    pub fn check(&self, user: &Addr) -> Result {
        self.granted_to()
            .and_then(|granted_to| check(&granted_to, user))
    }
}

impl<'storage, S> SingleUserAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage> + DerefMut,
{
    pub fn grant_to(&mut self, user: &Addr) -> Result {
        self.storage_item
            .save(self.storage.deref_mut(), user)
            .map_err(Into::into)
    }
}
