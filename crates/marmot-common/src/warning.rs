//! Pipeline warnings with colored terminal output.
//!
//! Provides deduplication so a malformed response or document reports each
//! problem once instead of once per character. Used by the HTTP, HTML and CSS
//! stages to report input they skip or degrade.
//!
//! The set of seen warnings is per thread. A load runs start to finish on one
//! thread, so loads on different threads never clear each other's warnings.

use std::cell::RefCell;
use std::collections::HashSet;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

thread_local! {
    /// Warnings already printed on this thread (to deduplicate)
    static WARNED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Warn about skipped or degraded input (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("HTTP", "non-hex byte 0x7a in chunk size line");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if first_sighting(component, message) {
        eprintln!("{YELLOW}[Marmot {component}] ⚠ {message}{RESET}");
    }
}

/// Record a warning key, returning `true` the first time it is seen.
fn first_sighting(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED.with(|warned| warned.borrow_mut().insert(key))
}

/// Clear the warnings recorded on this thread (call when loading a new
/// document).
pub fn clear_warnings() {
    WARNED.with(|warned| warned.borrow_mut().clear());
}
