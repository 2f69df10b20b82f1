pub mod serve;
pub mod users;

pub use serve::run_serve;
pub use users::run_users;
