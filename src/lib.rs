#[macro_use]
extern crate serde_derive;

pub mod activation;
pub mod dataset;
pub mod network;
pub mod trainer;
pub mod unit;

mod utils;
