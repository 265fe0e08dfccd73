pub mod cvrplib;
pub mod json;
pub mod parser;
