pub mod check;
pub mod exec;
pub mod name;
pub mod state;
