pub mod catalog;
pub mod context;
pub mod error;
pub mod journal;
pub mod logging;
pub mod model;
pub mod portal;
pub mod registration;
pub mod report;
pub mod runner;
pub mod schedule;
pub mod settings;
pub mod storage;
pub mod validation;
