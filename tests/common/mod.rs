#![allow(dead_code)]

pub mod mocks;
pub mod synthetic_basis;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
