#![forbid(unsafe_code)]

pub mod jsonfile;
pub mod repository;
pub mod sqlite;
