pub mod cli;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod plan;
pub mod rt;
pub mod schema;
pub mod wire;
