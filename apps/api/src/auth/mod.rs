// Accounts: registration, login, profile read/update, session tokens.
// Passwords are argon2id-hashed; roles come from verified tokens only.

pub mod handlers;
pub mod password;
pub mod token;
