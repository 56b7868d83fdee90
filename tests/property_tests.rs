//! Property-based tests using proptest
//!
//! These tests check engine-wide guarantees across a wide range of inputs:
//! lookahead never consumes, repetition always terminates, locations agree
//! with a naive line count, and choice aggregates failures in order.

use parsnip::prelude::*;
use proptest::prelude::*;

/// Line and column by walking the text byte by byte
fn naive_location(input: &str, offset: usize) -> (usize, usize) {
    let before = &input.as_bytes()[..offset];
    let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);
    (line, offset - line_start)
}

// =============================================================================
// Lookahead
// =============================================================================

proptest! {
    /// look_ahead leaves the stream where it started, on success or failure
    #[test]
    fn test_look_ahead_never_consumes(input in "[a-z0-9 ]{0,40}") {
        let parser = look_ahead(re("[a-z]+"));
        let reply = parser.apply((), Stream::new(&input));
        prop_assert_eq!(reply.stream.offset(), 0);
        prop_assert_eq!(reply.is_ok(), input.starts_with(|c: char| c.is_ascii_lowercase()));
    }

    /// look_ahead yields the same value the wrapped parser would
    #[test]
    fn test_look_ahead_value_matches(input in "[0-9]{1,10}[a-z]{0,5}") {
        let digits = re("[0-9]+");
        let peeked = look_ahead(digits.clone()).apply((), Stream::new(&input));
        let parsed = digits.apply((), Stream::new(&input));
        prop_assert_eq!(peeked.outcome, parsed.outcome);
    }
}

// =============================================================================
// Repetition
// =============================================================================

proptest! {
    /// many stops on a zero-width success instead of looping forever
    #[test]
    fn test_many_terminates_on_zero_width(input in "[ab]{0,30}") {
        let parser = many(optional("", str("a")));
        let reply = parser.apply((), Stream::new(&input));
        let leading = input.len() - input.trim_start_matches('a').len();
        prop_assert_eq!(reply.outcome.map(|values| values.len()), Ok(leading));
        prop_assert_eq!(reply.stream.offset(), leading);
    }

    /// many1 collects exactly the maximal run of matches
    #[test]
    fn test_many1_counts_run(run_len in 1usize..50, tail in "[b-z]{0,5}") {
        let input = format!("{}{}", "a".repeat(run_len), tail);
        let reply = many1(str("a")).apply((), Stream::new(&input));
        prop_assert_eq!(reply.outcome.map(|values| values.len()), Ok(run_len));
        prop_assert_eq!(reply.stream.remaining(), tail.as_str());
    }

    /// sep_by recovers every item of a joined list
    #[test]
    fn test_sep_by_recovers_items(items in prop::collection::vec("[a-z]{1,8}", 0..20)) {
        let input = items.join(",");
        let parser = sep_by(str(","), re("[a-z]+")).skip_right(eof());
        let result = run(&parser, &input).expect("joined list parses");
        prop_assert_eq!(result.value, items.iter().map(String::as_str).collect::<Vec<_>>());
    }

    /// count(n) consumes exactly n items or fails
    #[test]
    fn test_count_exact(n in 0usize..20, available in 0usize..20) {
        let input = "x".repeat(available);
        let reply = count(n, str("x")).apply((), Stream::new(&input));
        if n <= available {
            prop_assert_eq!(reply.outcome.map(|values| values.len()), Ok(n));
            prop_assert_eq!(reply.stream.offset(), n);
        } else {
            prop_assert!(reply.outcome.is_err());
        }
    }
}

// =============================================================================
// Locations
// =============================================================================

proptest! {
    /// Stream locations agree with a naive newline count
    #[test]
    fn test_location_consistency(input in "[a-c\n]{0,60}", cut in 0usize..61) {
        let offset = cut.min(input.len());
        let stream = Stream::new(&input).advance(offset);
        prop_assert_eq!((stream.line(), stream.column()), naive_location(&input, offset));
    }

    /// A failed run reports the location of the stream it stopped at
    #[test]
    fn test_failure_location_matches_stream(prefix in "[a\n]{0,30}") {
        let input = format!("{}!", prefix);
        let parser = many(re("[a\n]")).skip_right(eof());
        let failure = run(&parser, &input).unwrap_err();
        prop_assert_eq!(failure.stream.offset(), prefix.len());

        let location = failure.location();
        prop_assert_eq!((location.line, location.column), naive_location(&input, prefix.len()));
    }
}

// =============================================================================
// Choice
// =============================================================================

proptest! {
    /// Total failure of a choice concatenates every alternative's messages
    #[test]
    fn test_choice_concatenates_messages(words in prop::collection::vec("[a-m]{1,4}", 1..8)) {
        let parser = choice(words.iter().map(|w| str(w)).collect());
        let reply = parser.apply((), Stream::new("zzz"));
        let expected: Vec<String> = words.iter().map(|w| format!("expected \"{}\"", w)).collect();
        prop_assert_eq!(reply.outcome, Err(expected));
        prop_assert_eq!(reply.stream.offset(), 0);
    }

    /// The first matching alternative wins
    #[test]
    fn test_or_prefers_left(word in "[a-z]{1,6}") {
        let left = str(&word).map(|_| "left");
        let right = re("[a-z]+").map(|_| "right");
        let reply = or(left, right).apply((), Stream::new(&word));
        prop_assert_eq!(reply.outcome, Ok("left"));
    }
}

// =============================================================================
// State
// =============================================================================

proptest! {
    /// transform_state runs once per matched item
    #[test]
    fn test_state_counts_matches(n in 0usize..40) {
        let input = "ab".repeat(n);
        let parser = many(str("ab").skip_right(transform_state(|k: usize| k + 1)));
        let result = run_with_state(&parser, 0, &input).expect("many never fails");
        prop_assert_eq!(result.state, n);
    }
}
