pub mod records;
pub mod selection;
pub mod users;
