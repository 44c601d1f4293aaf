pub mod errors;
pub mod mailer;
pub mod repository;
pub mod repo;
pub mod service;
