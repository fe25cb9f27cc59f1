mod common;
mod records;
mod service;
