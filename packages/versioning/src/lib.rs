use sdk::{cosmwasm_std::Storage, cw_storage_plus::Item};

pub use self::{
    error::Error,
    release::Package,
    semver::{SemVer, VersionSegment},
};

pub mod error;
mod release;
mod semver;

const VERSION_STORAGE_KEY: Item<Package> = Item::new("contract_version");

pub fn initialize(storage: &mut dyn Storage, package: Package) -> Result<(), Error> {
    VERSION_STORAGE_KEY
        .save(storage, &package)
        .map_err(Error::storage)
}

pub fn load(storage: &dyn Storage) -> Result<Package, Error> {
    VERSION_STORAGE_KEY.load(storage).map_err(Error::storage)
}

/// Replace the stored package with `current` keeping the storage layout
///
/// Return the previously stored package. The name and the storage version must
/// match, and the software version must not go backwards.
pub fn update_software(storage: &mut dyn Storage, current: Package) -> Result<Package, Error> {
    load(storage)
        .and_then(|prev| check_update_allowed(&prev, &current).map(|()| prev))
        .and_then(|prev| initialize(storage, current).map(|()| prev))
}

fn check_update_allowed(prev: &Package, new: &Package) -> Result<(), Error> {
    if !prev.same_name(new) {
        Err(Error::package_names_mismatch(prev, new))
    } else if !prev.same_storage(new) {
        Err(Error::package_storage_versions_mismatch(prev, new))
    } else if prev.version() > new.version() {
        Err(Error::older_package_code(prev, new))
    } else {
        Ok(())
    }
}
