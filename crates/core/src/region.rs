//! Known storage regions
//!
//! Region overrides are resolved against this closed set. A name outside it
//! is a deployment error, not something to pass through to the client.

use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::Error;

macro_rules! regions {
    ($($variant:ident => $name:literal,)+) => {
        /// A storage region identifier
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Region {
            $($variant,)+
        }

        impl Region {
            /// Every known region
            pub const ALL: &'static [Region] = &[$(Region::$variant,)+];

            /// The region's canonical name, e.g. "us-west-2"
            pub const fn name(self) -> &'static str {
                match self {
                    $(Region::$variant => $name,)+
                }
            }
        }
    };
}

regions! {
    UsGovWest1 => "us-gov-west-1",
    UsGovEast1 => "us-gov-east-1",
    UsEast1 => "us-east-1",
    UsEast2 => "us-east-2",
    UsWest1 => "us-west-1",
    UsWest2 => "us-west-2",
    EuWest1 => "eu-west-1",
    EuWest2 => "eu-west-2",
    EuWest3 => "eu-west-3",
    EuCentral1 => "eu-central-1",
    EuCentral2 => "eu-central-2",
    EuNorth1 => "eu-north-1",
    EuSouth1 => "eu-south-1",
    EuSouth2 => "eu-south-2",
    ApEast1 => "ap-east-1",
    ApSouth1 => "ap-south-1",
    ApSouth2 => "ap-south-2",
    ApSoutheast1 => "ap-southeast-1",
    ApSoutheast2 => "ap-southeast-2",
    ApSoutheast3 => "ap-southeast-3",
    ApSoutheast4 => "ap-southeast-4",
    ApNortheast1 => "ap-northeast-1",
    ApNortheast2 => "ap-northeast-2",
    ApNortheast3 => "ap-northeast-3",
    SaEast1 => "sa-east-1",
    CaCentral1 => "ca-central-1",
    CaWest1 => "ca-west-1",
    CnNorth1 => "cn-north-1",
    CnNorthwest1 => "cn-northwest-1",
    MeSouth1 => "me-south-1",
    MeCentral1 => "me-central-1",
    AfSouth1 => "af-south-1",
    IlCentral1 => "il-central-1",
}

impl FromStr for Region {
    type Err = Error;

    /// Names are matched exactly; "US-WEST-2" is not a region
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| Error::UnknownRegion(s.to_string()))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
