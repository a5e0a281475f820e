pub mod filter;
pub mod sql;
