mod catalog;
mod common;
mod summary;
