use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sport {
    Nba,
    Wnba,
    CollegeBasketball,
    Nfl,
    CollegeFootball,
    Xfl,
    Mlb,
    Nhl,
    Soccer,
    Golf,
    Mma,
    Boxing,
    Tennis,
    AutoRacing,
    F1,
    Nascar,
    Esports,
    EsportsLol,
    EsportsCsgo,
    EsportsValorant,
    EsportsDota,
    CompetitiveEating,
    CulturePicks,
    AustralianRules,
    Cricket,
    Rugby,
    Other,
}

/// Display metadata attached to every projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SportInfo {
    pub sport: Sport,
    pub name: &'static str,
    pub emoji: &'static str,
    pub badge: &'static str,
}

pub const ALL_SPORTS: [Sport; 27] = [
    Sport::Nba,
    Sport::Wnba,
    Sport::CollegeBasketball,
    Sport::Nfl,
    Sport::CollegeFootball,
    Sport::Xfl,
    Sport::Mlb,
    Sport::Nhl,
    Sport::Soccer,
    Sport::Golf,
    Sport::Mma,
    Sport::Boxing,
    Sport::Tennis,
    Sport::AutoRacing,
    Sport::F1,
    Sport::Nascar,
    Sport::Esports,
    Sport::EsportsLol,
    Sport::EsportsCsgo,
    Sport::EsportsValorant,
    Sport::EsportsDota,
    Sport::CompetitiveEating,
    Sport::CulturePicks,
    Sport::AustralianRules,
    Sport::Cricket,
    Sport::Rugby,
    Sport::Other,
];

impl Sport {
    pub fn name(self) -> &'static str {
        match self {
            Sport::Nba => "NBA Basketball",
            Sport::Wnba => "WNBA Basketball",
            Sport::CollegeBasketball => "College Basketball",
            Sport::Nfl => "NFL Football",
            Sport::CollegeFootball => "College Football",
            Sport::Xfl => "XFL Football",
            Sport::Mlb => "MLB Baseball",
            Sport::Nhl => "NHL Hockey",
            Sport::Soccer => "Soccer",
            Sport::Golf => "Golf",
            Sport::Mma => "MMA/UFC",
            Sport::Boxing => "Boxing",
            Sport::Tennis => "Tennis",
            Sport::AutoRacing => "Auto Racing",
            Sport::F1 => "F1 Racing",
            Sport::Nascar => "NASCAR",
            Sport::Esports => "Esports",
            Sport::EsportsLol => "Esports - LoL",
            Sport::EsportsCsgo => "Esports - CS:GO",
            Sport::EsportsValorant => "Esports - Valorant",
            Sport::EsportsDota => "Esports - Dota 2",
            Sport::CompetitiveEating => "Competitive Eating",
            Sport::CulturePicks => "Culture Picks",
            Sport::AustralianRules => "Australian Rules",
            Sport::Cricket => "Cricket",
            Sport::Rugby => "Rugby",
            Sport::Other => "Other Sports",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Sport::Nba | Sport::Wnba | Sport::CollegeBasketball => "🏀",
            Sport::Nfl | Sport::CollegeFootball | Sport::Xfl => "🏈",
            Sport::Mlb => "⚾",
            Sport::Nhl => "🏒",
            Sport::Soccer => "⚽",
            Sport::Golf => "🏌️",
            Sport::Mma | Sport::Boxing => "🥊",
            Sport::Tennis => "🎾",
            Sport::AutoRacing | Sport::F1 | Sport::Nascar => "🏎️",
            Sport::Esports
            | Sport::EsportsLol
            | Sport::EsportsCsgo
            | Sport::EsportsValorant
            | Sport::EsportsDota => "🎮",
            Sport::CompetitiveEating => "🍽️",
            Sport::CulturePicks => "🎯",
            Sport::AustralianRules | Sport::Rugby => "🏉",
            Sport::Cricket => "🏏",
            Sport::Other => "🏆",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Sport::Nba => "NBA",
            Sport::Wnba => "WNBA",
            Sport::CollegeBasketball => "CBB",
            Sport::Nfl => "NFL",
            Sport::CollegeFootball => "CFB",
            Sport::Xfl => "XFL",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
            Sport::Soccer => "SOCCER",
            Sport::Golf => "GOLF",
            Sport::Mma => "MMA",
            Sport::Boxing => "BOX",
            Sport::Tennis => "TENNIS",
            Sport::AutoRacing => "RACING",
            Sport::F1 => "F1",
            Sport::Nascar => "NASCAR",
            Sport::Esports => "ESPORTS",
            Sport::EsportsLol => "LOL",
            Sport::EsportsCsgo => "CSGO",
            Sport::EsportsValorant => "VAL",
            Sport::EsportsDota => "DOTA2",
            Sport::CompetitiveEating => "EAT",
            Sport::CulturePicks => "CULTURE",
            Sport::AustralianRules => "AFL",
            Sport::Cricket => "CRICKET",
            Sport::Rugby => "RUGBY",
            Sport::Other => "OTHER",
        }
    }

    /// The-Odds-API sport key, where the market exists there.
    pub fn odds_api_key(self) -> Option<&'static str> {
        match self {
            Sport::Nba => Some("basketball_nba"),
            Sport::Wnba => Some("basketball_wnba"),
            Sport::CollegeBasketball => Some("basketball_ncaab"),
            Sport::Nfl => Some("americanfootball_nfl"),
            Sport::CollegeFootball => Some("americanfootball_ncaaf"),
            Sport::Xfl => Some("americanfootball_xfl"),
            Sport::Mlb => Some("baseball_mlb"),
            Sport::Nhl => Some("icehockey_nhl"),
            Sport::Soccer => Some("soccer_uefa_champs_league"),
            Sport::Golf => Some("golf_pga"),
            Sport::Mma => Some("mma_mixed_martial_arts"),
            Sport::Boxing => Some("boxing_boxing"),
            Sport::Tennis => Some("tennis_atp"),
            Sport::AutoRacing => Some("racing"),
            Sport::F1 => Some("racing_f1"),
            Sport::Nascar => Some("racing_nascar"),
            Sport::AustralianRules => Some("australian_rules"),
            Sport::Cricket => Some("cricket"),
            Sport::Rugby => Some("rugby_union"),
            _ => None,
        }
    }

    pub fn info(self) -> SportInfo {
        SportInfo {
            sport: self,
            name: self.name(),
            emoji: self.emoji(),
            badge: self.badge(),
        }
    }

    /// Parses a display name or badge, case-insensitively.
    pub fn from_label(raw: &str) -> Option<Sport> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        ALL_SPORTS
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(raw) || s.badge().eq_ignore_ascii_case(raw))
    }
}

// The feed's league ids are not stable; several ids have been observed for NBA alone.
const LEAGUE_TABLE: &[(&str, Sport)] = &[
    ("4", Sport::Nba),
    ("46", Sport::Nba),
    ("47", Sport::Nba),
    ("48", Sport::Nba),
    ("49", Sport::Nba),
    ("50", Sport::Nba),
    ("51", Sport::Nba),
    ("52", Sport::Nba),
    ("53", Sport::Nba),
    ("54", Sport::Nba),
    ("55", Sport::Nba),
    ("14", Sport::Wnba),
    ("2", Sport::Nfl),
    ("15", Sport::CollegeFootball),
    ("17", Sport::Xfl),
    ("1", Sport::Mlb),
    ("3", Sport::Nhl),
    ("5", Sport::Soccer),
    ("6", Sport::Golf),
    ("7", Sport::Mma),
    ("11", Sport::Boxing),
    ("8", Sport::Tennis),
    ("9", Sport::AutoRacing),
    ("21", Sport::F1),
    ("22", Sport::Nascar),
    ("10", Sport::Esports),
    ("23", Sport::EsportsLol),
    ("24", Sport::EsportsCsgo),
    ("25", Sport::EsportsValorant),
    ("26", Sport::EsportsDota),
    ("16", Sport::CollegeBasketball),
    ("12", Sport::CompetitiveEating),
    ("13", Sport::CulturePicks),
    ("18", Sport::AustralianRules),
    ("19", Sport::Cricket),
    ("20", Sport::Rugby),
];

const ROSTERS: &[(Sport, &[&str])] = &[
    (
        Sport::Nba,
        &[
            "LeBron James",
            "Stephen Curry",
            "Kevin Durant",
            "Giannis Antetokounmpo",
            "Nikola Jokic",
            "Luka Doncic",
            "Joel Embiid",
            "Jayson Tatum",
            "Shai Gilgeous-Alexander",
            "Anthony Edwards",
            "Devin Booker",
            "Cade Cunningham",
            "Karl-Anthony Towns",
        ],
    ),
    (
        Sport::Nfl,
        &[
            "Patrick Mahomes",
            "Josh Allen",
            "Lamar Jackson",
            "Jalen Hurts",
            "Joe Burrow",
            "Justin Jefferson",
            "Tyreek Hill",
            "Christian McCaffrey",
            "Travis Kelce",
        ],
    ),
    (
        Sport::Mlb,
        &[
            "Shohei Ohtani",
            "Aaron Judge",
            "Mookie Betts",
            "Juan Soto",
            "Ronald Acuna",
            "Gerrit Cole",
        ],
    ),
    (
        Sport::Nhl,
        &[
            "Connor McDavid",
            "Auston Matthews",
            "Nathan MacKinnon",
            "Leon Draisaitl",
            "Nikita Kucherov",
        ],
    ),
    (
        Sport::Soccer,
        &[
            "Lionel Messi",
            "Cristiano Ronaldo",
            "Erling Haaland",
            "Kylian Mbappe",
            "Mohamed Salah",
            "Harry Kane",
        ],
    ),
    (
        Sport::Tennis,
        &[
            "Novak Djokovic",
            "Carlos Alcaraz",
            "Jannik Sinner",
            "Aryna Sabalenka",
            "Iga Swiatek",
        ],
    ),
    (
        Sport::Golf,
        &["Scottie Scheffler", "Rory McIlroy", "Jon Rahm", "Xander Schauffele"],
    ),
];

/// Resolves a feed record to a sport: league table first, then the curated
/// rosters, then `Other`.
pub fn map_sport(league_id: &str, subject_name: &str) -> SportInfo {
    sport_for_league(league_id)
        .or_else(|| sport_from_roster(subject_name))
        .unwrap_or(Sport::Other)
        .info()
}

pub fn sport_for_league(league_id: &str) -> Option<Sport> {
    let key = league_id.trim();
    LEAGUE_TABLE
        .iter()
        .find(|(id, _)| *id == key)
        .map(|(_, sport)| *sport)
}

pub fn sport_from_roster(subject_name: &str) -> Option<Sport> {
    let name = subject_name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    for (sport, roster) in ROSTERS {
        if roster
            .iter()
            .any(|athlete| name.contains(&athlete.to_lowercase()))
        {
            return Some(*sport);
        }
    }
    None
}
