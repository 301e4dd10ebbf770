use std::path::Path;
use crate::cleanse::constants::*;
use crate::cleanse::error::CleanseError;

/// One raw source row, every column kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub fields: Vec<String>,
}

impl SourceRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn from_csv_record(record: &csv::StringRecord) -> Self {
        Self {
            fields: record.iter().map(str::to_string).collect(),
        }
    }

    /// Returns the cell at `index`, or `None` when it is absent or an NA token.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .filter(|value| !is_null_token(value))
    }
}

pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// Header of the source export with the positions of the columns we project.
#[derive(Debug, Clone)]
pub struct SourceHeader {
    /// Header cells exactly as read, used for the original dump.
    pub raw: Vec<String>,
    /// Trimmed, BOM-free names used for column lookup.
    pub columns: Vec<String>,
    login_id: usize,
    mail_address: usize,
    password: usize,
    salt: usize,
    birthday_on: usize,
    gender: usize,
}

impl SourceHeader {
    pub fn from_csv_record(record: &csv::StringRecord, path: &Path) -> Result<Self, CleanseError> {
        let columns: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = if i == 0 { name.trim_start_matches(UTF8_BOM) } else { name };
                name.trim().to_string()
            })
            .collect();

        let position = |column: &'static str| {
            columns
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| CleanseError::MissingColumn {
                    column,
                    path: path.to_path_buf(),
                })
        };

        Ok(Self {
            login_id: position(COL_LOGIN_ID)?,
            mail_address: position(COL_MAIL_ADDRESS)?,
            password: position(COL_PASSWORD)?,
            salt: position(COL_SALT)?,
            birthday_on: position(COL_BIRTHDAY_ON)?,
            gender: position(COL_GENDER)?,
            raw: record.iter().map(str::to_string).collect(),
            columns,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.columns.len()
    }

    /// Selects the six columns of interest from a raw row. Extra columns are ignored.
    pub fn project(&self, row: &SourceRecord) -> Record {
        let text = |index: usize| row.cell(index).map(str::to_string);
        let gender_raw = text(self.gender);
        let gender = gender_raw.as_deref().and_then(|g| g.trim().parse::<f64>().ok());

        Record {
            login_id: text(self.login_id),
            mail_address: text(self.mail_address),
            password: text(self.password),
            salt: text(self.salt),
            birthday_on: text(self.birthday_on),
            gender_unparsed: gender_raw.is_some() && gender.is_none(),
            gender,
        }
    }
}

/// The six projected source fields, still under their export names.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub login_id: Option<String>,
    pub mail_address: Option<String>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub birthday_on: Option<String>,
    pub gender: Option<f64>,
    /// Set when the gender cell held text that is not a number.
    pub gender_unparsed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub login: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<f64>,
}

/// Hashable form of a whole cleaned row, used for full-row deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    login: Option<String>,
    email: Option<String>,
    password: Option<String>,
    salt: Option<String>,
    date_of_birth: Option<String>,
    gender_bits: Option<u64>,
}

impl From<Record> for CleanedRecord {
    fn from(record: Record) -> Self {
        Self {
            login: record.login_id,
            email: record.mail_address,
            password: record.password,
            salt: record.salt,
            date_of_birth: record.birthday_on,
            gender: record.gender,
        }
    }
}

impl CleanedRecord {
    pub fn has_essential_data(&self) -> bool {
        self.login.is_some() || self.email.is_some() || self.password.is_some()
    }

    pub fn dedup_key(&self) -> (Option<&str>, Option<&str>) {
        (self.email.as_deref(), self.login.as_deref())
    }

    pub fn full_key(&self) -> RowKey {
        RowKey {
            login: self.login.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            salt: self.salt.clone(),
            date_of_birth: self.date_of_birth.clone(),
            // -0.0 and 0.0 compare equal, so they must hash the same
            gender_bits: self.gender.map(|g| if g == 0.0 { 0.0f64.to_bits() } else { g.to_bits() }),
        }
    }

    pub fn to_csv_fields(&self) -> [String; 6] {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        [
            text(&self.login),
            text(&self.email),
            text(&self.password),
            text(&self.salt),
            text(&self.date_of_birth),
            self.gender.map(format_gender).unwrap_or_default(),
        ]
    }
}

/// Renders gender the way the float column was exported: `1.0`, `2.0`, `1.5`,
/// and `1e+16` / `1e-05` for exponent forms (signed, at least two digits).
pub fn format_gender(gender: f64) -> String {
    let repr = format!("{:?}", gender);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}
