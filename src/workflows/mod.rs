pub mod hh;
pub mod search;
pub mod vacancy;
