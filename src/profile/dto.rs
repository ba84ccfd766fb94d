use serde::{Deserialize, Serialize};

/// Profile as typed by the user: every field is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Only the exact label "Male" maps to `Male`.
    pub fn from_label(label: &str) -> Self {
        if label == "Male" {
            Self::Male
        } else {
            Self::Female
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("age {0:?} does not start with a whole number")]
    Age(String),
    #[error("weight {0:?} is not a number")]
    Weight(String),
    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(f64),
}

/// Validated profile used by the intake calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub age: i64,
    pub sex: Sex,
    pub height_cm: Option<f64>,
    pub weight_kg: f64,
}

impl Profile {
    pub fn parse(raw: &RawProfile) -> Result<Self, ValidationError> {
        let age = leading_int(&raw.age).ok_or_else(|| ValidationError::Age(raw.age.clone()))?;

        let weight_kg = raw
            .weight
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .ok_or_else(|| ValidationError::Weight(raw.weight.clone()))?;
        if weight_kg <= 0.0 {
            return Err(ValidationError::NonPositiveWeight(weight_kg));
        }

        // height is informational only
        let height_cm = raw
            .height
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite() && *h > 0.0);

        Ok(Self {
            age,
            sex: Sex::from_label(&raw.sex),
            height_cm,
            weight_kg,
        })
    }
}

/// Integer read from the start of user input, ignoring anything after the
/// digits: "25.5" is 25, "-5" is -5, "abc" is nothing.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let n = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -n } else { n })
}

/// A number the server may send either as JSON number or as string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

fn is_positive(field: &Option<NumberOrText>) -> bool {
    field
        .as_ref()
        .and_then(NumberOrText::value)
        .is_some_and(|v| v.is_finite() && v > 0.0)
}

/// Profile record as stored by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteProfile {
    #[serde(default)]
    pub age: Option<NumberOrText>,
    #[serde(default)]
    pub gender_id: Option<NumberOrText>,
    #[serde(default)]
    pub height: Option<NumberOrText>,
    #[serde(default)]
    pub weight: Option<NumberOrText>,
}

impl NumberOrText {
    fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

fn field_text(field: &Option<NumberOrText>) -> String {
    field.as_ref().map(NumberOrText::to_text).unwrap_or_default()
}

impl RemoteProfile {
    /// The server record in the shape the app stores and edits. Gender id 2
    /// is "Female", anything else "Male".
    pub fn to_raw(&self) -> RawProfile {
        let female = self.gender_id.as_ref().and_then(NumberOrText::value) == Some(2.0);
        RawProfile {
            age: field_text(&self.age),
            sex: if female { "Female" } else { "Male" }.to_string(),
            height: field_text(&self.height),
            weight: field_text(&self.weight),
        }
    }

    /// Empty means the server holds nothing worth keeping: no valid age, no
    /// valid gender, or neither height nor weight.
    pub fn is_empty(&self) -> bool {
        !is_positive(&self.age)
            || !is_positive(&self.gender_id)
            || (!is_positive(&self.height) && !is_positive(&self.weight))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProfileResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<RemoteProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the remote profile write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub gender_id: String,
    pub age: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub activity_level: String,
}

pub const DEFAULT_ACTIVITY_LEVEL: &str = "active";

/// "Female" maps to "2"; every other label, "Male" included, maps to "1".
pub fn gender_id_for(sex: &str) -> &'static str {
    if sex == "Female" {
        "2"
    } else {
        "1"
    }
}

impl ProfileUpdate {
    pub fn from_draft(draft: &RawProfile) -> Self {
        Self {
            gender_id: gender_id_for(&draft.sex).to_string(),
            age: draft.age.clone(),
            height_cm: draft.height.clone(),
            weight_kg: draft.weight.clone(),
            activity_level: DEFAULT_ACTIVITY_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(age: &str, sex: &str, height: &str, weight: &str) -> RawProfile {
        RawProfile {
            age: age.into(),
            sex: sex.into(),
            height: height.into(),
            weight: weight.into(),
        }
    }

    #[test]
    fn parses_valid_profile() {
        let p = Profile::parse(&raw(" 25 ", "Male", "170", "70.5")).unwrap();
        assert_eq!(p.age, 25);
        assert_eq!(p.sex, Sex::Male);
        assert_eq!(p.height_cm, Some(170.0));
        assert_eq!(p.weight_kg, 70.5);
    }

    #[test]
    fn age_takes_leading_integer() {
        let age = |text: &str| Profile::parse(&raw(text, "Male", "", "70")).map(|p| p.age);
        assert_eq!(age("25.5"), Ok(25));
        assert_eq!(age("-5"), Ok(-5));
        assert_eq!(age("+40"), Ok(40));
        assert_eq!(age(" 31 years"), Ok(31));
    }

    #[test]
    fn unknown_sex_label_is_female() {
        let p = Profile::parse(&raw("40", "other", "", "60")).unwrap();
        assert_eq!(p.sex, Sex::Female);
        assert_eq!(p.height_cm, None);
    }

    #[test]
    fn rejects_bad_age_and_weight() {
        assert_eq!(
            Profile::parse(&raw("abc", "Male", "", "70")),
            Err(ValidationError::Age("abc".into()))
        );
        assert_eq!(
            Profile::parse(&raw("", "Male", "", "70")),
            Err(ValidationError::Age("".into()))
        );
        assert_eq!(
            Profile::parse(&raw("-", "Male", "", "70")),
            Err(ValidationError::Age("-".into()))
        );
        assert_eq!(
            Profile::parse(&raw("25", "Male", "", "")),
            Err(ValidationError::Weight("".into()))
        );
        assert_eq!(
            Profile::parse(&raw("25", "Male", "", "NaN")),
            Err(ValidationError::Weight("NaN".into()))
        );
        assert_eq!(
            Profile::parse(&raw("25", "Male", "", "0")),
            Err(ValidationError::NonPositiveWeight(0.0))
        );
    }

    #[test]
    fn remote_emptiness_rules() {
        let full: RemoteProfile = serde_json::from_value(serde_json::json!({
            "age": 30, "gender_id": 1, "height": "170", "weight": "70"
        }))
        .unwrap();
        assert!(!full.is_empty());

        let zero_age = RemoteProfile {
            age: Some(NumberOrText::Number(0.0)),
            ..full.clone()
        };
        assert!(zero_age.is_empty());

        let no_gender = RemoteProfile {
            gender_id: None,
            ..full.clone()
        };
        assert!(no_gender.is_empty());

        let only_weight = RemoteProfile {
            height: Some(NumberOrText::Text("".into())),
            ..full.clone()
        };
        assert!(!only_weight.is_empty());

        let no_measures = RemoteProfile {
            height: None,
            weight: Some(NumberOrText::Text("0".into())),
            ..full
        };
        assert!(no_measures.is_empty());

        assert!(RemoteProfile::default().is_empty());
    }

    #[test]
    fn remote_profile_converts_to_raw() {
        let remote: RemoteProfile = serde_json::from_value(serde_json::json!({
            "age": 42, "gender_id": "2", "height": 168.5, "weight": " 61 "
        }))
        .unwrap();
        assert_eq!(remote.to_raw(), raw("42", "Female", "168.5", "61"));

        let partial = RemoteProfile {
            age: Some(NumberOrText::Number(30.0)),
            gender_id: Some(NumberOrText::Number(1.0)),
            ..Default::default()
        };
        assert_eq!(partial.to_raw(), raw("30", "Male", "", ""));
    }

    #[test]
    fn update_maps_sex_to_gender_id() {
        let female = ProfileUpdate::from_draft(&raw("30", "Female", "160", "55"));
        assert_eq!(female.gender_id, "2");
        assert_eq!(female.height_cm, "160");
        assert_eq!(female.weight_kg, "55");
        assert_eq!(female.activity_level, "active");

        assert_eq!(gender_id_for("Male"), "1");
        assert_eq!(gender_id_for("female"), "1");
    }
}
