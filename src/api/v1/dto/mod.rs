pub mod examples;
pub mod health;
pub mod oauth2;
pub mod profile;
