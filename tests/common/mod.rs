#![allow(dead_code, unused_imports)]

use std::error::Error;

pub use taskpool_test_utils::builders;
pub use taskpool_test_utils::{init_tracing, timed, with_timeout};

pub type TestResult = Result<(), Box<dyn Error>>;
