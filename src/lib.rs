pub mod bridge;
pub mod db;
pub mod parser;
pub mod report;
pub mod rest;
pub mod sensor;
pub mod serial;
pub mod sink;
