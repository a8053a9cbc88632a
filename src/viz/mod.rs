pub mod filtering;
pub mod force;
pub mod space;
