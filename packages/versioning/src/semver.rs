use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use sdk::schemars::{self, JsonSchema};

pub type VersionSegment = u16;

#[derive(
    Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize, JsonSchema,
)]
pub struct SemVer {
    major: VersionSegment,
    minor: VersionSegment,
    patch: VersionSegment,
}

impl SemVer {
    /// Parse a `major.minor.patch` string at compile time
    pub const fn parse(version: &str) -> Self {
        let bytes = version.as_bytes();
        let (major, at) = parse_segment(bytes, 0);
        let at = expect_separator(bytes, at);
        let (minor, at) = parse_segment(bytes, at);
        let at = expect_separator(bytes, at);
        let (patch, at) = parse_segment(bytes, at);

        if at != bytes.len() {
            panic!("Unexpected characters after the patch segment of the version string!");
        }

        Self {
            major,
            minor,
            patch,
        }
    }
}

const fn parse_segment(bytes: &[u8], mut at: usize) -> (VersionSegment, usize) {
    let start = at;
    let mut segment: VersionSegment = 0;

    while at < bytes.len() && bytes[at].is_ascii_digit() {
        segment = match segment.checked_mul(10) {
            Some(shifted) => match shifted.checked_add((bytes[at] - b'0') as VersionSegment) {
                Some(segment) => segment,
                None => panic!("Version segment overflow!"),
            },
            None => panic!("Version segment overflow!"),
        };
        at += 1;
    }

    if at == start {
        panic!("Version segment is not a number!");
    }

    (segment, at)
}

const fn expect_separator(bytes: &[u8], at: usize) -> usize {
    if at < bytes.len() && bytes[at] == b'.' {
        at + 1
    } else {
        panic!("Expected a '.' between version segments!");
    }
}

impl Display for SemVer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
