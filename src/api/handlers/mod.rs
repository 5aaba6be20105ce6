pub mod employee;
pub mod facility;
pub mod health;
pub mod request;
