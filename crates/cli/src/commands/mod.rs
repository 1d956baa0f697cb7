//! `emp` subcommands.

pub mod cart;
pub mod checkout;
pub mod migrate;
pub mod order;
pub mod products;
pub mod seed;
