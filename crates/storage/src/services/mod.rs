pub mod rating;
pub mod selection;
pub mod stats;
