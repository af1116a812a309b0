use thiserror::Error;

use sdk::cosmwasm_std::StdError;

use crate::Package;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("[Versioning] {0}")]
    Storage(StdError),

    #[error(
        "[Versioning] The package names do not match! The current package is \"{0}\", the new package is \"{1}\"."
    )]
    PackageNamesMismatch(String, String),

    #[error(
        "[Versioning] The package does not increase monotonically! The current package is \"{0}\", the new package is \"{1}\"."
    )]
    OlderPackageCode(String, String),

    #[error(
        "[Versioning] The package storage versions do not match! The current package is \"{0}\", the new package is \"{1}\"."
    )]
    PackageStorageVersionMismatch(String, String),
}

impl Error {
    pub fn storage(cause: StdError) -> Self {
        Self::Storage(cause)
    }

    pub fn package_names_mismatch(current: &Package, new: &Package) -> Self {
        Self::PackageNamesMismatch(current.to_string(), new.to_string())
    }

    pub fn older_package_code(current: &Package, new: &Package) -> Self {
        Self::OlderPackageCode(current.to_string(), new.to_string())
    }

    pub fn package_storage_versions_mismatch(current: &Package, new: &Package) -> Self {
        Self::PackageStorageVersionMismatch(current.to_string(), new.to_string())
    }
}
