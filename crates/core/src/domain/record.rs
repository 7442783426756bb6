use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One day of case/death counts for a single state, as published by the CDC.
///
/// The API transports every value as a string (numbers included). Fields are kept
/// verbatim so they render exactly as received; a key missing from the payload,
/// or sent as `null`, becomes an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub submission_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tot_cases: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conf_cases: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prob_cases: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub new_case: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pnew_case: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tot_death: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conf_death: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prob_death: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub new_death: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pnew_death: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub consent_cases: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub consent_deaths: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Records for one state, ascending by `submission_date` as requested from the API.
pub type Series = Vec<CaseRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseField {
    SubmissionDate,
    TotCases,
    ConfCases,
    ProbCases,
    NewCase,
    PnewCase,
    TotDeath,
    ConfDeath,
    ProbDeath,
    NewDeath,
    PnewDeath,
    CreatedAt,
    ConsentCases,
    ConsentDeaths,
}

impl CaseField {
    /// All fields, in table column order.
    pub const ALL: [CaseField; 14] = [
        CaseField::SubmissionDate,
        CaseField::TotCases,
        CaseField::ConfCases,
        CaseField::ProbCases,
        CaseField::NewCase,
        CaseField::PnewCase,
        CaseField::TotDeath,
        CaseField::ConfDeath,
        CaseField::ProbDeath,
        CaseField::NewDeath,
        CaseField::PnewDeath,
        CaseField::CreatedAt,
        CaseField::ConsentCases,
        CaseField::ConsentDeaths,
    ];

    /// Name of the field in the API payload.
    pub fn as_str(self) -> &'static str {
        match self {
            CaseField::SubmissionDate => "submission_date",
            CaseField::TotCases => "tot_cases",
            CaseField::ConfCases => "conf_cases",
            CaseField::ProbCases => "prob_cases",
            CaseField::NewCase => "new_case",
            CaseField::PnewCase => "pnew_case",
            CaseField::TotDeath => "tot_death",
            CaseField::ConfDeath => "conf_death",
            CaseField::ProbDeath => "prob_death",
            CaseField::NewDeath => "new_death",
            CaseField::PnewDeath => "pnew_death",
            CaseField::CreatedAt => "created_at",
            CaseField::ConsentCases => "consent_cases",
            CaseField::ConsentDeaths => "consent_deaths",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, CaseField::SubmissionDate | CaseField::CreatedAt)
    }
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown case field: {}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for CaseField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        CaseField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| UnknownField(name.to_string()))
    }
}

impl CaseRecord {
    pub fn get(&self, field: CaseField) -> &str {
        match field {
            CaseField::SubmissionDate => &self.submission_date,
            CaseField::TotCases => &self.tot_cases,
            CaseField::ConfCases => &self.conf_cases,
            CaseField::ProbCases => &self.prob_cases,
            CaseField::NewCase => &self.new_case,
            CaseField::PnewCase => &self.pnew_case,
            CaseField::TotDeath => &self.tot_death,
            CaseField::ConfDeath => &self.conf_death,
            CaseField::ProbDeath => &self.prob_death,
            CaseField::NewDeath => &self.new_death,
            CaseField::PnewDeath => &self.pnew_death,
            CaseField::CreatedAt => &self.created_at,
            CaseField::ConsentCases => &self.consent_cases,
            CaseField::ConsentDeaths => &self.consent_deaths,
        }
    }
}
