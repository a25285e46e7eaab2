//! Command line and HTTP front-end for `cardiorisk-classifiers`.
pub mod batch;
pub mod config;
pub mod server;
