pub mod probe;
pub mod providers;
