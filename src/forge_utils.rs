pub mod common;
pub mod create;

pub use self::common::ContractSpec;
pub use self::create::{ForgeCreate, ForgeOutput};
