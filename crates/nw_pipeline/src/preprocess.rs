/// Minimum normalized length below which article text is discarded
/// entirely rather than summarized.
const MIN_TEXT_LENGTH: usize = 100;

/// Trim and collapse whitespace runs to single spaces. Texts shorter than
/// `MIN_TEXT_LENGTH` after normalization come back as an empty string.
pub fn clean(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() < MIN_TEXT_LENGTH {
        return String::new();
    }
    normalized
}

/// Greedily pack whitespace-delimited words into chunks. The running size
/// counts each word plus one separator; a word that would push past
/// `max_chunk_size` starts a new chunk. A single word longer than
/// `max_chunk_size` becomes its own chunk.
pub fn chunk(text: &str, max_chunk_size: usize) -> Vec<String> {
    debug_assert!(max_chunk_size > 0);

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize;

    for word in text.split_whitespace() {
        if current_size + word.len() > max_chunk_size && !current.is_empty() {
            chunks.push(current.join(" "));
            current = vec![word];
            current_size = word.len();
        } else {
            current.push(word);
            current_size += word.len() + 1;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_discards_short_text() {
        assert_eq!(clean("too short"), "");
        assert_eq!(clean(""), "");
        // 99 'a's separated into words still normalizes under the threshold.
        let just_under = "a ".repeat(49);
        assert_eq!(clean(&just_under), "");
    }

    #[test]
    fn test_clean_normalizes_whitespace() {
        let text = format!("  leading\n\nand   internal\t gaps {}", "x".repeat(100));
        let cleaned = clean(&text);
        assert!(cleaned.starts_with("leading and internal gaps"));
        assert!(!cleaned.contains("  "));
        assert!(!cleaned.contains('\n'));
    }

    #[test]
    fn test_clean_keeps_long_text() {
        let text = "word ".repeat(40);
        let cleaned = clean(&text);
        assert_eq!(cleaned, text.trim());
    }

    #[test]
    fn test_chunk_reconstructs_word_sequence() {
        let text = "the quick brown fox jumps over the lazy dog".repeat(20);
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let chunks = chunk(&normalized, 50);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join(" "), normalized);
    }

    #[test]
    fn test_chunk_respects_max_size() {
        let text = "alpha beta gamma delta epsilon zeta eta theta".repeat(10);
        for c in chunk(&text, 40) {
            let accumulated: usize = c.split_whitespace().map(|w| w.len() + 1).sum();
            assert!(accumulated <= 40 + 1, "chunk too large: {}", c);
        }
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk("", 100).is_empty());
        assert!(chunk("   ", 100).is_empty());
    }

    #[test]
    fn test_chunk_oversized_word_gets_own_chunk() {
        let long_word = "x".repeat(50);
        let text = format!("small {} small", long_word);
        let chunks = chunk(&text, 10);
        assert!(chunks.iter().any(|c| c == &long_word));
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }
}
