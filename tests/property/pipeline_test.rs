// tests/property/pipeline_test.rs

//! Property-based tests for response framing.

use crate::test_helpers::TestContext;
use proptest::prelude::*;

/// A mix of valid, malformed and unknown request lines.
fn request_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ping".to_string()),
        Just("status".to_string()),
        Just("stats".to_string()),
        Just("clear".to_string()),
        Just("playlistinfo".to_string()),
        Just("commands".to_string()),
        Just(r#"add "albums/blue/01-intro.ogg""#.to_string()),
        Just(r#"add "missing.ogg""#.to_string()),
        "playlistinfo [0-9]{1,3}",
        "[a-z_]{1,16}( [a-z0-9\"]{1,8})?",
    ]
}

fn is_terminated_once(lines: &[String]) -> bool {
    let Some((last, body)) = lines.split_last() else {
        return false;
    };
    let terminal = last == "OK" || last.starts_with("ACK ");
    terminal && !body.iter().any(|l| l == "OK" || l.starts_with("ACK "))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_every_response_ends_with_exactly_one_sentinel(lines in prop::collection::vec(request_line(), 1..20)) {
        let mut ctx = TestContext::new();
        for line in &lines {
            // Batches, idle mode and `close` deliberately answer with no lines.
            let name = line.split(' ').next().unwrap_or_default();
            if name.starts_with("command_list") || name.starts_with("idle") || name == "close" || name == "noidle" {
                continue;
            }
            let response = ctx.send(line);
            prop_assert!(
                is_terminated_once(&response.lines),
                "bad framing for {:?}: {:?}", line, response.lines
            );
            prop_assert_eq!(response.is_ok(), response.lines.last().map(String::as_str) == Some("OK"));
        }
    }

    #[test]
    fn test_batch_failure_position_matches_ack_index(
        good in 0usize..6,
        bad_first in any::<bool>(),
    ) {
        let mut ctx = TestContext::new();
        ctx.send("command_list_begin");
        let failing_at = if bad_first { 0 } else { good };
        for i in 0..=good {
            if i == failing_at {
                ctx.send("frobnicate");
            } else {
                ctx.send("ping");
            }
        }
        ctx.send("ping");
        let lines = ctx.lines("command_list_end");
        prop_assert_eq!(lines.len(), 1);
        let expected = format!("ACK [5@{failing_at}]");
        prop_assert!(lines[0].starts_with(&expected));
    }
}
