pub mod api;
#[cfg(feature = "contract")]
pub mod contract;
#[cfg(feature = "contract")]
pub mod error;
#[cfg(feature = "contract")]
mod loan;
#[cfg(feature = "contract")]
pub mod result;
#[cfg(feature = "contract")]
mod state;
