//! Human approval of recommendations

pub mod prompt;
