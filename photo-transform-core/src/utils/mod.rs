//! 工具函数模块

pub mod lenient;
pub mod placeholder;
pub mod title;

pub use title::title;
