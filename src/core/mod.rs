pub mod config;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod shape;
pub mod syntax;
pub mod table;
pub mod types;
