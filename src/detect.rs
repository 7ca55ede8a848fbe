
mod adapter;
mod scanner;
mod worker;

pub use adapter::Detector;
pub use scanner::{CodeScanner, QrScanner, Symbol};
pub(crate) use worker::detection_loop;
