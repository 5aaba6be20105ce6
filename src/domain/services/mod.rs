pub mod admission;
pub mod employee_cache;
