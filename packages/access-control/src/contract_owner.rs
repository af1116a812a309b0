use std::ops::{Deref, DerefMut};

use sdk::cosmwasm_std::{Addr, Storage};

use crate::{SingleUserAccess, error::Result};

const CONTRACT_OWNER_NAMESPACE: &str = "contract_owner";

/// The address that instantiated the contract
pub struct ContractOwnerAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage>,
{
    access: SingleUserAccess<'storage, S>,
}

impl<'storage, S> ContractOwnerAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage>,
{
    pub const fn new(storage: S) -> Self {
        Self {
            access: SingleUserAccess::new(storage, CONTRACT_OWNER_NAMESPACE),
        }
    }

    pub fn owner(&self) -> Result<Addr> {
        self.access.granted_to()
    }

    pub fn check(&self, user: &Addr) -> Result {
        self.access.check(user)
    }
}

impl<'storage, S> ContractOwnerAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage> + DerefMut,
{
    pub fn grant_to(&mut self, user: &Addr) -> Result {
        self.access.grant_to(user)
    }
}
