pub mod embedding;
pub mod health;
pub mod search;
