#![allow(dead_code)]

pub mod registry;
pub mod symptra_env;
