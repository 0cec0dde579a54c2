pub mod classify;
pub mod dispatch;
pub mod eval;
pub mod extract;
pub mod fetch;
pub mod generate;
pub mod report;

pub use dispatch::dispatch;
