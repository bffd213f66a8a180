pub mod auth;
pub mod users;

pub use auth::AuthCommands;
pub use users::UsersCommands;
