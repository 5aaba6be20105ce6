pub mod employee;
pub mod facility;
pub mod request;
