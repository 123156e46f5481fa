//! Property-based tests for chunking invariants
//!
//! 1. Coverage: every non-whitespace character lies inside some window
//! 2. Termination: the last window ends at the end of the text
//! 3. Shape: windows are at most `chunk_size` long and start strictly later
//! 4. Fidelity: window text is the character slice `[start, end)`

use proptest::prelude::*;
use robot_rag::{chunk_text, clean_text, ChunkingConfig};

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Zé .,\n\t]{0,300}").expect("Valid regex")
}

proptest! {
    #[test]
    fn prop_windows_cover_text(raw in text_strategy(), size in 1usize..60, overlap in 0usize..80) {
        let text = clean_text(&raw);
        let chars: Vec<char> = text.chars().collect();
        let windows: Vec<_> = chunk_text(&text, size, overlap).collect();

        for (position, c) in chars.iter().enumerate() {
            if !c.is_whitespace() {
                prop_assert!(
                    windows.iter().any(|w| w.start <= position && position < w.end),
                    "character {} not covered", position
                );
            }
        }

        if !text.is_empty() {
            prop_assert_eq!(windows.last().map(|w| w.end), Some(chars.len()));
        } else {
            prop_assert!(windows.is_empty());
        }
    }

    #[test]
    fn prop_window_shape(raw in text_strategy(), size in 1usize..60, overlap in 0usize..80) {
        let text = clean_text(&raw);
        let chars: Vec<char> = text.chars().collect();
        let step = ChunkingConfig::new(size, overlap).step();
        prop_assert!(step >= 1);

        let windows: Vec<_> = chunk_text(&text, size, overlap).collect();
        for w in &windows {
            prop_assert!(w.start < w.end);
            prop_assert!(w.end - w.start <= size);
            prop_assert_eq!(w.end, (w.start + size).min(chars.len()));
            prop_assert_eq!(w.start % step, 0);
            let expected: String = chars[w.start..w.end].iter().collect();
            prop_assert_eq!(w.text, expected.as_str());
            prop_assert!(!w.text.trim().is_empty());
        }
        for pair in windows.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }
}

#[test]
fn test_degenerate_sizes() {
    assert_eq!(chunk_text("abc", 0, 0).count(), 0);
    assert_eq!(chunk_text("abc", 1, 0).count(), 3);
    // Overlap larger than the chunk collapses to a fifth of it
    assert_eq!(ChunkingConfig::new(10, 25).step(), 8);
    assert_eq!(ChunkingConfig::new(1, 5).step(), 1);
}
