pub mod context;
pub mod generative;
pub mod records;
pub mod turn;
