pub mod palette;
pub mod weather;
