pub mod employer;
pub mod vacancy;
