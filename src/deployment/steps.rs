pub mod address_registry;
pub mod art_factory;
pub mod assemble_report;
pub mod creath;
pub mod marketplace;
pub mod token_registry;
pub mod treasury;
