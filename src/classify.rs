/// Minimum trimmed length for a subject name to be considered a person.
pub const MIN_PLAYER_NAME_LEN: usize = 5;

/// Tokens with no lowercase letters up to this length read as abbreviations ("LAL", "NYK").
const ABBREVIATION_MAX_LEN: usize = 4;

/// Substrings that mark team, club or combo entries. Matched case-sensitively.
pub const TEAM_KEYWORDS: &[&str] = &[
    "United",
    "FC",
    "City",
    "Club",
    "Team",
    "Athletic",
    "Rovers",
    "Wanderers",
    "Sporting",
    "Esports",
    "Gaming",
    "/",
    "+",
    " vs ",
    " vs. ",
    " @ ",
];

/// Decides whether a feed subject names an individual athlete.
///
/// Rules run in order and the first one that rejects wins. Anything that does
/// not clearly look like "First Last" is treated as a non-player.
pub fn is_player_name(subject_name: &str) -> bool {
    let name = subject_name.trim();
    if name.chars().count() < MIN_PLAYER_NAME_LEN {
        return false;
    }
    if !name.chars().any(char::is_whitespace) {
        return false;
    }
    if name.split_whitespace().all(is_abbreviation) {
        return false;
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if TEAM_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return false;
    }

    let tokens: Vec<&str> = name.split_whitespace().collect();
    tokens.len() >= 2 && tokens.iter().all(|t| t.chars().count() >= 2)
}

fn is_abbreviation(token: &str) -> bool {
    token.chars().count() <= ABBREVIATION_MAX_LEN && !token.chars().any(char::is_lowercase)
}
