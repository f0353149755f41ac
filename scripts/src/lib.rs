//! Scripts for deploying the value feed smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod backend;
pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod plan;
mod solidity;
pub mod types;
pub mod utils;
