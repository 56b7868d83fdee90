//! Per-thread store of compiled `re` patterns
//!
//! Grammar functions rebuild their `re` parsers every time they are called,
//! and a `lazy` rule does so at every nesting level. Each distinct pattern is
//! therefore compiled once per thread and shared. Patterns that fail to
//! compile are remembered as well, so the failure is logged once.

use ahash::RandomState;
use hashbrown::HashMap;
use regex::Regex;
use std::cell::RefCell;

type PatternMap = HashMap<Box<str>, Option<Regex>, RandomState>;

thread_local! {
    static PATTERNS: RefCell<PatternMap> = RefCell::new(HashMap::with_hasher(RandomState::new()));
}

/// The regex matching `pattern` only at the start of the haystack, or `None`
/// if `pattern` is not a valid regular expression.
///
/// The pattern is wrapped as `^(?:pattern)` so a top-level alternation is
/// anchored as a whole.
pub(crate) fn anchored(pattern: &str) -> Option<Regex> {
    PATTERNS.with(|patterns| {
        if let Some(known) = patterns.borrow().get(pattern) {
            return known.clone();
        }

        let compiled = match Regex::new(&format!("^(?:{})", pattern)) {
            Ok(regex) => Some(regex),
            Err(_err) => {
                log_debug!("invalid pattern {:?}: {}", pattern, _err);
                None
            }
        };
        patterns
            .borrow_mut()
            .insert(Box::from(pattern), compiled.clone());
        compiled
    })
}
