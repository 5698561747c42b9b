/// API route modules
pub mod health;
pub mod mappings;
pub mod users;
