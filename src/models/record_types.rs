use serde::{Deserialize, Serialize, Serializer};

/// Columns every batch file must carry, in the order the API expects them.
pub const REQUIRED_COLUMNS: [&str; 6] = ["age", "sex", "bmi", "children", "smoker", "region"];

/// Raw form values exactly as the UI hands them over.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SingleForm {
    pub age: String,
    pub sex: String,
    pub bmi: String,
    pub children: String,
    pub smoker: String,
    pub region: String,
}

/// One subject sent to `/predict`.
///
/// Numeric fields hold `NaN` when the form value did not parse, so the
/// validator can report them instead of failing at read time.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SingleRecord {
    #[serde(serialize_with = "serialize_number")]
    pub age: f64,
    pub sex: String,
    #[serde(serialize_with = "serialize_number")]
    pub bmi: f64,
    #[serde(serialize_with = "serialize_number")]
    pub children: f64,
    pub smoker: String,
    pub region: String,
}

impl SingleRecord {
    pub fn from_form(form: &SingleForm) -> Self {
        Self {
            age: parse_number(&form.age),
            sex: form.sex.clone(),
            bmi: parse_number(&form.bmi),
            children: parse_number(&form.children),
            smoker: form.smoker.clone(),
            region: form.region.clone(),
        }
    }
}

pub fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

// Whole numbers go out as JSON integers (`30`, not `30.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Smoker {
    Yes,
    No,
}

impl Smoker {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Smoker::Yes),
            "no" => Some(Smoker::No),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Southeast,
    Southwest,
    Northeast,
    Northwest,
}

impl Region {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "southeast" => Some(Region::Southeast),
            "southwest" => Some(Region::Southwest),
            "northeast" => Some(Region::Northeast),
            "northwest" => Some(Region::Northwest),
            _ => None,
        }
    }
}
