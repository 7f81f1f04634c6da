mod rating;
mod record;
mod selection;
mod user;

pub use rating::Rating;
pub use record::Record;
pub use selection::Selection;
pub use user::User;
