pub mod backend;
pub mod local_store;
