pub mod examples;
pub mod health;
pub mod hello;
pub mod metrics;
pub mod oauth2;
pub mod protected;
