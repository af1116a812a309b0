use std::{
    borrow::Cow,
    fmt::{Display, Formatter, Result as FmtResult},
};

use serde::{Deserialize, Serialize};

use sdk::schemars::{self, JsonSchema};

use crate::semver::{SemVer, VersionSegment};

/// A released contract package
///
/// The name is borrowed when built from the crate metadata and owned when
/// loaded back from the contract storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Package {
    name: Cow<'static, str>,
    version: SemVer,
    storage: VersionSegment,
}

#[macro_export]
macro_rules! package_name {
    () => {{
        ::core::env!(
            "CARGO_PKG_NAME",
            "Cargo package name is not set as an environment variable!"
        )
    }};
}

#[macro_export]
macro_rules! package_version {
    () => {{
        $crate::SemVer::parse(::core::env!(
            "CARGO_PKG_VERSION",
            "Cargo package version is not set as an environment variable!"
        ))
    }};
}

/// The package of the crate this macro is expanded in, with the given storage version
#[macro_export]
macro_rules! package {
    ($storage: expr) => {{
        $crate::Package::new(
            $crate::package_name!(),
            $crate::package_version!(),
            $storage,
        )
    }};
}

impl Package {
    pub const fn new(name: &'static str, version: SemVer, storage: VersionSegment) -> Self {
        Self {
            name: Cow::Borrowed(name),
            version,
            storage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn version(&self) -> SemVer {
        self.version
    }

    pub const fn storage(&self) -> VersionSegment {
        self.storage
    }

    pub fn same_name(&self, other: &Self) -> bool {
        self.name == other.name
    }

    pub const fn same_storage(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_fmt(format_args!(
            "name: {}, version: {}, storage: {}",
            self.name, self.version, self.storage
        ))
    }
}
