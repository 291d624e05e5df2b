// utils/mod.rs
// Image output helpers
pub mod save_utils;
