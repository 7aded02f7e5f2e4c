pub mod binaries;
pub mod exec;
pub mod profile;
