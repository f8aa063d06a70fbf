// tests/logging.rs

use taskpool::logging::{init_logging, parse_level_str};
use tracing::Level;

#[test]
fn parses_level_names() {
    assert_eq!(parse_level_str("debug"), Some(Level::DEBUG));
    assert_eq!(parse_level_str(" WARNING "), Some(Level::WARN));
    assert_eq!(parse_level_str("trace"), Some(Level::TRACE));
    assert_eq!(parse_level_str("loud"), None);
}

// Only test in this binary that touches the global subscriber.
#[test]
fn second_init_fails() {
    assert!(init_logging(Some(Level::DEBUG)).is_ok());
    assert!(init_logging(None).is_err());
}
