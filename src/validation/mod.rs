// src/validation/mod.rs

pub mod schedule;

pub use schedule::{Diagnostic, Resolution, resolve};
