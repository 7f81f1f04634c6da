pub mod rating;
pub mod record;
pub mod selection;
pub mod user;
