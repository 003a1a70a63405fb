// Command handlers module
pub mod check;

pub use check::execute as check;
