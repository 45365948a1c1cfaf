//! U.S. states and territories accepted as a search location

/// Lower-cased names of every state, district and territory a search may target
pub static US_STATES: [&str; 57] = [
    "alaska",
    "alabama",
    "arkansas",
    "arizona",
    "california",
    "colorado",
    "connecticut",
    "dc",
    "district of columbia",
    "delaware",
    "florida",
    "georgia",
    "hawaii",
    "iowa",
    "idaho",
    "illinois",
    "indiana",
    "kansas",
    "kentucky",
    "louisiana",
    "massachusetts",
    "maryland",
    "maine",
    "michigan",
    "minnesota",
    "missouri",
    "mississippi",
    "montana",
    "north carolina",
    "north dakota",
    "nebraska",
    "new hampshire",
    "new jersey",
    "new mexico",
    "nevada",
    "new york",
    "ohio",
    "oklahoma",
    "oregon",
    "pennsylvania",
    "rhode island",
    "south carolina",
    "south dakota",
    "tennessee",
    "texas",
    "utah",
    "virginia",
    "vermont",
    "washington",
    "wisconsin",
    "west virginia",
    "wyoming",
    "american samoa",
    "guam",
    "northern mariana islands",
    "puerto rico",
    "virgin islands",
];

/// Checks a state name against `US_STATES`, ignoring case and surrounding whitespace
pub fn is_valid_state(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    US_STATES.iter().any(|state| *state == name)
}
