pub mod meeting;
pub mod ports;
