use serde::Deserialize;

// clients send ids and difficulties either as JSON numbers or as numeric strings
// ("3" from form inputs), so accept both
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrInt {
    Int(i64),
    Text(String),
}

impl TextOrInt {
    pub fn into_text(self) -> String {
        match self {
            TextOrInt::Int(v) => v.to_string(),
            TextOrInt::Text(v) => v,
        }
    }

    /// False for `0` and `""`, the values a form leaves behind when a field is blank.
    pub fn is_present(&self) -> bool {
        match self {
            TextOrInt::Int(v) => *v != 0,
            TextOrInt::Text(v) => !v.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "TextOrInt")]
pub struct Loosei64(pub i64);

impl TryFrom<TextOrInt> for Loosei64 {
    type Error = String;

    fn try_from(value: TextOrInt) -> Result<Self, Self::Error> {
        match value {
            TextOrInt::Int(v) => Ok(Loosei64(v)),
            TextOrInt::Text(v) => match v.trim().parse::<i64>() {
                Ok(v) => Ok(Loosei64(v)),
                Err(_) => Err(format!("Wrong value {v}, can not parse to i64")),
            },
        }
    }
}
