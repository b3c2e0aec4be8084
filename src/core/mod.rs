pub mod counter;
pub mod store;
