use serde::{Deserialize, Serialize};
use shrinkwraprs::Shrinkwrap;
use strum::EnumIter;

macro_rules! impl_primitive_num {
    (pub struct $outer:ident($tname:ty)) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Serialize,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Deserialize,
            Shrinkwrap,
        )]
        pub struct $outer(pub $tname);

        impl std::fmt::Display for $outer {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $outer {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

impl_primitive_num!(pub struct ChainId(u64));
impl_primitive_num!(pub struct AccountIndex(u32));
impl_primitive_num!(pub struct PlatformFee(u64));

impl Default for AccountIndex {
    fn default() -> Self {
        Self(0)
    }
}

/// Contracts of the Creath marketplace, declared in canonical deployment order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContractName {
    Creath,
    TokenRegistry,
    Treasury,
    Marketplace,
    ArtFactory,
    AddressRegistry,
}

impl ContractName {
    /// Label printed next to the deployed address.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Creath => "Creath",
            Self::TokenRegistry => "Token Registry",
            Self::Treasury => "Treasury",
            Self::Marketplace => "Marketplace",
            Self::ArtFactory => "Art Factory",
            Self::AddressRegistry => "Address Registry",
        }
    }

    /// Contract name as known to forge.
    pub fn artifact(&self) -> &'static str {
        match self {
            Self::Creath => "Creath",
            Self::TokenRegistry => "CreathTokenRegistry",
            Self::Treasury => "CreathTreasury",
            Self::Marketplace => "CreathMarketplace",
            Self::ArtFactory => "CreathArtFactory",
            Self::AddressRegistry => "CreathAddressRegistry",
        }
    }

    pub fn dependencies(&self) -> &'static [ContractName] {
        match self {
            Self::Marketplace => &[Self::Treasury],
            Self::AddressRegistry => &[
                Self::Creath,
                Self::Marketplace,
                Self::ArtFactory,
                Self::TokenRegistry,
            ],
            _ => &[],
        }
    }
}

impl std::fmt::Display for ContractName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn dependencies_precede_dependents() {
        for contract in ContractName::iter() {
            for dep in contract.dependencies() {
                assert!(
                    dep < &contract,
                    "{dep} must come before {contract}"
                );
            }
        }
    }

    #[test]
    fn primitive_from_str() {
        let fee: PlatformFee = "20".parse().unwrap();
        assert_eq!(*fee, 20);
        assert!("x".parse::<ChainId>().is_err());
    }
}
