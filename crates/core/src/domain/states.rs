use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsState {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub territory: bool,
}

const fn state(name: &'static str, abbreviation: &'static str) -> UsState {
    UsState {
        name,
        abbreviation,
        territory: false,
    }
}

const fn territory(name: &'static str, abbreviation: &'static str) -> UsState {
    UsState {
        name,
        abbreviation,
        territory: true,
    }
}

/// Selectable jurisdictions, alphabetical by name.
pub const US_STATES: &[UsState] = &[
    state("Alabama", "AL"),
    state("Alaska", "AK"),
    territory("American Samoa", "AS"),
    state("Arizona", "AZ"),
    state("Arkansas", "AR"),
    state("California", "CA"),
    state("Colorado", "CO"),
    state("Connecticut", "CT"),
    state("Delaware", "DE"),
    territory("District Of Columbia", "DC"),
    territory("Federated States Of Micronesia", "FM"),
    state("Florida", "FL"),
    state("Georgia", "GA"),
    territory("Guam", "GU"),
    state("Hawaii", "HI"),
    state("Idaho", "ID"),
    state("Illinois", "IL"),
    state("Indiana", "IN"),
    state("Iowa", "IA"),
    state("Kansas", "KS"),
    state("Kentucky", "KY"),
    state("Louisiana", "LA"),
    state("Maine", "ME"),
    territory("Marshall Islands", "MH"),
    state("Maryland", "MD"),
    state("Massachusetts", "MA"),
    state("Michigan", "MI"),
    state("Minnesota", "MN"),
    state("Mississippi", "MS"),
    state("Missouri", "MO"),
    state("Montana", "MT"),
    state("Nebraska", "NE"),
    state("Nevada", "NV"),
    state("New Hampshire", "NH"),
    state("New Jersey", "NJ"),
    state("New Mexico", "NM"),
    state("New York", "NY"),
    state("North Carolina", "NC"),
    state("North Dakota", "ND"),
    territory("Northern Mariana Islands", "MP"),
    state("Ohio", "OH"),
    state("Oklahoma", "OK"),
    state("Oregon", "OR"),
    territory("Palau", "PW"),
    state("Pennsylvania", "PA"),
    territory("Puerto Rico", "PR"),
    state("Rhode Island", "RI"),
    state("South Carolina", "SC"),
    state("South Dakota", "SD"),
    state("Tennessee", "TN"),
    state("Texas", "TX"),
    state("Utah", "UT"),
    state("Vermont", "VT"),
    territory("Virgin Islands", "VI"),
    state("Virginia", "VA"),
    state("Washington", "WA"),
    state("West Virginia", "WV"),
    state("Wisconsin", "WI"),
    state("Wyoming", "WY"),
];

impl UsState {
    pub fn by_abbreviation(abbreviation: &str) -> Option<&'static UsState> {
        let abbreviation = abbreviation.trim();
        US_STATES
            .iter()
            .find(|s| s.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    pub fn by_name(name: &str) -> Option<&'static UsState> {
        let name = name.trim();
        US_STATES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a user selection: an abbreviation, a full name, or the
    /// `"Name,AB"` pair used as a select-option value. For the pair form the
    /// abbreviation wins.
    pub fn lookup(selection: &str) -> Option<&'static UsState> {
        let selection = selection.trim();
        if let Some((_, abbreviation)) = selection.rsplit_once(',') {
            return Self::by_abbreviation(abbreviation);
        }
        Self::by_abbreviation(selection).or_else(|| Self::by_name(selection))
    }

    /// Value for a select option, `"Name,AB"`.
    pub fn option_value(&self) -> String {
        format!("{},{}", self.name, self.abbreviation)
    }
}
