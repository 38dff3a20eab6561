mod dashboard;
mod error;
mod period;
mod permissions;
mod time_entry;
mod user;

pub use dashboard::*;
pub use error::*;
pub use period::*;
pub use permissions::*;
pub use time_entry::*;
pub use user::*;
