pub mod columns;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod export;
pub mod input;
pub mod output;
pub mod parallelism;
pub mod profile;
pub mod record;
pub mod report;
pub mod symbols;
pub mod workbook;
