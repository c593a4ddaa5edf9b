//! 입력 사양과 예측 결과 타입

pub mod fabric;
pub mod property;

pub use fabric::*;
pub use property::*;
