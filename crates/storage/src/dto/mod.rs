pub mod common;
pub mod record;
pub mod selection;
pub mod stats;
pub mod user;
