use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use sdk::cosmwasm_std::Addr;

/// An externally verifiable participant address
///
/// Comparison and hashing ignore ASCII case, display keeps the original form.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    const SHORT_HEAD: usize = 6;
    const SHORT_TAIL: usize = 4;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address as `head...tail`, or as it is if not longer than the two parts together
    pub fn short(&self) -> String {
        let len = self.0.len();

        if !self.0.is_ascii() || len <= Self::SHORT_HEAD + Self::SHORT_TAIL {
            self.0.clone()
        } else {
            format!(
                "{}...{}",
                &self.0[..Self::SHORT_HEAD],
                &self.0[len - Self::SHORT_TAIL..]
            )
        }
    }

    pub fn to_addr(&self) -> Addr {
        Addr::unchecked(self.0.as_str())
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for Identity {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.0
            .bytes()
            .for_each(|byte| state.write_u8(byte.to_ascii_lowercase()));
        state.write_u8(0xff);
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<Addr> for Identity {
    fn from(value: Addr) -> Self {
        Self(value.into_string())
    }
}

impl From<&Addr> for Identity {
    fn from(value: &Addr) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}
