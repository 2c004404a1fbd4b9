//! Splitting normalized text into synthesis-sized chunks

/// Split text into chunks of at most `max_chars` characters, preferring
/// sentence boundaries.
///
/// A sentence boundary is a run of whitespace immediately preceded by `.`,
/// `!` or `?`. This is a heuristic, not grammatical sentence detection;
/// abbreviations such as "e.g." split early. When a single sentence exceeds
/// the budget it is broken at word boundaries instead, and a single word
/// longer than the budget is hard-cut into `max_chars`-character slices,
/// each emitted as its own chunk.
///
/// The returned iterator is lazy and a pure function of its inputs: calling
/// `chunk_text` again restarts it. Every yielded chunk is trimmed and
/// non-empty; chunks appear in original order and, joined with single
/// spaces, reproduce the input's words. Empty input yields nothing.
///
/// `max_chars` must be positive.
pub fn chunk_text(text: &str, max_chars: usize) -> Chunks<'_> {
    assert!(max_chars > 0, "max_chars must be positive");
    Chunks {
        rest: text.trim(),
        max_chars,
        mid_word: false,
    }
}

/// Iterator over the chunks of one piece of text. See [`chunk_text`].
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    rest: &'a str,
    max_chars: usize,
    /// The previous chunk was a fixed-size slice cut out of a word that is
    /// longer than the budget; the word's remaining slices are emitted
    /// standalone before boundary packing resumes.
    mid_word: bool,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        if self.mid_word {
            return Some(self.next_word_slice());
        }

        // One forward scan over at most max_chars + 1 characters, tracking
        // the best cut points that still fit the budget.
        let mut chars_seen = 0usize;
        let mut sentence_cut = None;
        let mut word_cut = None;
        let mut hard_cut = None;
        let mut prev: Option<char> = None;
        let mut overflow = false;

        for (i, c) in self.rest.char_indices() {
            // `chars_seen` is the character length of self.rest[..i].
            if chars_seen > self.max_chars {
                overflow = true;
                break;
            }

            if c.is_whitespace() {
                if prev.is_some_and(|p| !p.is_whitespace()) {
                    word_cut = Some(i);
                    if matches!(prev, Some('.' | '!' | '?')) {
                        sentence_cut = Some(i);
                    }
                }
            }

            chars_seen += 1;
            if chars_seen == self.max_chars {
                hard_cut = Some(i + c.len_utf8());
            }
            prev = Some(c);
        }

        if !overflow {
            let chunk = self.rest;
            self.rest = "";
            return Some(chunk);
        }

        let cut = match sentence_cut.or(word_cut) {
            Some(cut) => cut,
            None => {
                // Not even the first word fits; start hard-splitting it.
                self.mid_word = true;
                hard_cut.expect("budget is at least one character")
            }
        };
        let chunk = &self.rest[..cut];
        self.rest = self.rest[cut..].trim_start();
        Some(chunk)
    }
}

impl<'a> Chunks<'a> {
    /// Emit the next slice of a word being hard-split. The final slice is
    /// the word's remainder, emitted on its own even when short.
    fn next_word_slice(&mut self) -> &'a str {
        let word_end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        let word = &self.rest[..word_end];

        if word.chars().count() <= self.max_chars {
            self.mid_word = false;
            self.rest = self.rest[word_end..].trim_start();
            return word;
        }

        let cut = word
            .char_indices()
            .nth(self.max_chars)
            .map(|(i, _)| i)
            .expect("word is longer than the budget");
        let chunk = &self.rest[..cut];
        self.rest = &self.rest[cut..];
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(text: &str, max_chars: usize) -> Vec<&str> {
        chunk_text(text, max_chars).collect()
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        assert_eq!(chunks("Hello world.", 900), vec!["Hello world."]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(chunks("", 20), Vec::<&str>::new());
        assert_eq!(chunks("   ", 20), Vec::<&str>::new());
    }

    #[test]
    fn test_greedy_packing_boundary_arithmetic() {
        let text = "Hello world. This is a test sentence that is somewhat longer.";
        assert_eq!(
            chunks(text, 20),
            vec![
                "Hello world.",
                "This is a test",
                "sentence that is",
                "somewhat longer.",
            ]
        );
    }

    #[test]
    fn test_prefers_sentence_boundary_over_longer_word_fit() {
        // "Hello world. This" would fit 20 chars, but the sentence boundary wins.
        let text = "Hello world. This is a test sentence that is somewhat longer.";
        assert_eq!(chunks(text, 20)[0], "Hello world.");
    }

    #[test]
    fn test_packs_multiple_sentences_per_chunk() {
        let text = "One. Two. Three. Four.";
        assert_eq!(chunks(text, 10), vec!["One. Two.", "Three.", "Four."]);
    }

    #[test]
    fn test_oversized_word_is_hard_split() {
        let token = "a".repeat(50);
        let parts = chunks(&token, 20);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 20);
        assert_eq!(parts[1].len(), 20);
        assert_eq!(parts[2].len(), 10);
    }

    #[test]
    fn test_hard_split_remainder_is_its_own_chunk() {
        let text = format!("{} tail words here.", "x".repeat(25));
        let expected = vec!["x".repeat(20), "x".repeat(5), "tail words here.".to_string()];
        assert_eq!(chunks(&text, 20), expected);
    }

    #[test]
    fn test_exclamation_and_question_boundaries() {
        let text = "Really? Yes! Quite sure about it.";
        assert_eq!(chunks(text, 12), vec!["Really? Yes!", "Quite sure", "about it."]);
    }

    #[test]
    fn test_multibyte_characters_are_counted_not_measured_in_bytes() {
        // Ten two-byte characters fit a ten-character budget exactly.
        let text = "éééééééééé";
        assert_eq!(chunks(text, 10), vec![text]);
        assert_eq!(chunks(text, 4), vec!["éééé", "éééé", "éé"]);
    }

    #[test]
    fn test_chunks_cover_all_words_in_order() {
        let text = "The quick brown fox jumps over the lazy dog. It was not amused! Not at all.";
        for max in [10, 15, 25, 40, 200] {
            let joined = chunks(text, max).join(" ");
            assert_eq!(joined, text, "max_chars = {}", max);
        }
    }

    #[test]
    fn test_no_chunk_exceeds_budget_or_is_empty() {
        let text = "Some sentences. Followed by a considerably-longer-than-average word: \
                    pneumonoultramicroscopicsilicovolcanoconiosis. And a short coda.";
        for max in [5, 12, 30, 900] {
            for chunk in chunk_text(text, max) {
                assert!(!chunk.trim().is_empty());
                assert!(chunk.chars().count() <= max, "{:?} exceeds {}", chunk, max);
            }
        }
    }

    #[test]
    fn test_restartable() {
        let text = "First sentence. Second sentence.";
        let a: Vec<&str> = chunk_text(text, 16).collect();
        let b: Vec<&str> = chunk_text(text, 16).collect();
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "max_chars must be positive")]
    fn test_zero_budget_is_rejected() {
        let _ = chunk_text("hello", 0);
    }
}
