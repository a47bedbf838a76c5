pub mod export;
pub mod profiles;
pub mod schema;
