//! Character substitution for legacy catalog text.
//!
//! Card titles and illustrator credits arrive with private-use / legacy code
//! points standing in for glyphs a bespoke source font carried. This table
//! maps each of them to a displayable character. It is static and
//! exhaustive; no substituted character is itself a source key, so applying
//! the table twice is the same as applying it once.

/// Legacy code point -> displayable character.
const REPLACEMENTS: [(char, char); 22] = [
    ('\u{203E}', '~'),
    ('\u{301C}', '～'),
    ('\u{49FA}', 'ê'),
    ('\u{5F5C}', 'ū'),
    ('\u{66E6}', 'à'),
    ('\u{66E9}', 'è'),
    ('\u{8E94}', '★'),
    ('\u{9A2B}', 'á'),
    ('\u{9A69}', 'Ø'),
    ('\u{9A6B}', 'ā'),
    ('\u{9A6A}', 'ō'),
    ('\u{9AAD}', 'ü'),
    ('\u{9B2F}', 'ī'),
    ('\u{9EF7}', 'ē'),
    ('\u{9F63}', 'Ú'),
    ('\u{9F67}', 'Ä'),
    ('\u{973B}', '♠'),
    ('\u{9F6A}', '♣'),
    ('\u{9448}', '♦'),
    ('\u{9F72}', '♥'),
    ('\u{9F76}', '♡'),
    ('\u{9F77}', 'é'),
];

/// Replace every legacy code point in `input` with its displayable form.
pub fn substitute(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            REPLACEMENTS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_code_points() {
        assert_eq!(substitute("\u{8E94}"), "★");
        assert_eq!(substitute("\u{203E}"), "~");
        assert_eq!(substitute("A\u{9F77}B"), "AéB");
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let s = "Scarlet Devil ～ U.N.Owen";
        assert_eq!(substitute(s), s);
    }

    #[test]
    fn is_idempotent() {
        let raw = "\u{301C}x\u{8E94}\u{9A69}y\u{9F72}";
        let once = substitute(raw);
        assert_eq!(substitute(&once), once);
    }

    #[test]
    fn no_target_is_a_source_key() {
        for (_, to) in REPLACEMENTS {
            assert!(
                !REPLACEMENTS.iter().any(|(from, _)| *from == to),
                "substituted char {to:?} must not be a source key"
            );
        }
    }
}
