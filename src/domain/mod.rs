pub mod health;
pub mod ogiri;
