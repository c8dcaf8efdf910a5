//! Student records
//!
//! The `Etudiant` entity and the validated payloads used to create and
//! update it. Raw input arrives as strings and is validated here so that
//! every rejection is reported as a field-level validation error.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::{BusinessError, BusinessResult};

/// Study level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    L1,
    L2,
    L3,
    M1,
    M2,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::L1, Level::L2, Level::L3, Level::M1, Level::M2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
            Level::M1 => "M1",
            Level::M2 => "M2",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = BusinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| BusinessError::validation("niveau", format!("niveau inconnu '{}'", s)))
    }
}

/// Student entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub matricule: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub program: String,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Build a student from validated input
    pub fn create(id: u64, input: NewStudent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            matricule: matricule_for(id, now.year()),
            last_name: input.last_name,
            first_name: input.first_name,
            email: input.email,
            date_of_birth: input.date_of_birth,
            program: input.program,
            level: input.level,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply validated changes; returns true when anything changed
    pub fn apply(&mut self, changes: StudentChanges, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        if let Some(last_name) = changes.last_name {
            changed |= last_name != self.last_name;
            self.last_name = last_name;
        }
        if let Some(first_name) = changes.first_name {
            changed |= first_name != self.first_name;
            self.first_name = first_name;
        }
        if let Some(email) = changes.email {
            changed |= email != self.email;
            self.email = email;
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            changed |= date_of_birth != self.date_of_birth;
            self.date_of_birth = date_of_birth;
        }
        if let Some(program) = changes.program {
            changed |= program != self.program;
            self.program = program;
        }
        if let Some(level) = changes.level {
            changed |= level != self.level;
            self.level = level;
        }

        if changed {
            self.updated_at = now;
        }
        changed
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration number: `ETU-{year}-{id:04}`
pub fn matricule_for(id: u64, year: i32) -> String {
    format!("ETU-{}-{:04}", year, id)
}

/// Raw student input as received from a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentInput {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub program: String,
    pub level: String,
}

/// Validated data for a new student
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub program: String,
    pub level: Level,
}

impl NewStudent {
    /// Validate raw input, reporting the first offending field
    pub fn parse(input: StudentInput, today: NaiveDate) -> BusinessResult<Self> {
        Ok(Self {
            last_name: required("nom", &input.last_name)?,
            first_name: required("prenom", &input.first_name)?,
            email: parse_email(&input.email)?,
            date_of_birth: parse_birth_date(&input.date_of_birth, today)?,
            program: required("filiere", &input.program)?,
            level: input.level.parse()?,
        })
    }
}

/// Raw partial update as received from a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentChanges {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub program: Option<String>,
    pub level: Option<Level>,
}

impl StudentChanges {
    pub fn parse(patch: StudentPatch, today: NaiveDate) -> BusinessResult<Self> {
        let changes = Self {
            last_name: patch.last_name.map(|v| required("nom", &v)).transpose()?,
            first_name: patch.first_name.map(|v| required("prenom", &v)).transpose()?,
            email: patch.email.map(|v| parse_email(&v)).transpose()?,
            date_of_birth: patch
                .date_of_birth
                .map(|v| parse_birth_date(&v, today))
                .transpose()?,
            program: patch.program.map(|v| required("filiere", &v)).transpose()?,
            level: patch.level.map(|v| v.parse()).transpose()?,
        };

        if changes.is_empty() {
            return Err(BusinessError::validation_message(
                "Aucune modification fournie",
            ));
        }
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.email.is_none()
            && self.date_of_birth.is_none()
            && self.program.is_none()
            && self.level.is_none()
    }
}

// =========================================================================
// Field validation
// =========================================================================

/// Trimmed, non-empty text
pub fn required(field: &str, value: &str) -> BusinessResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BusinessError::validation(field, "champ obligatoire"));
    }
    Ok(value.to_string())
}

/// Normalized (trimmed, lowercase) email address
pub fn parse_email(value: &str) -> BusinessResult<String> {
    let email = value.trim().to_lowercase();
    if email.is_empty() {
        return Err(BusinessError::validation("email", "champ obligatoire"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(BusinessError::validation("email", "format invalide"));
    }
    Ok(email)
}

/// Birth date in `YYYY-MM-DD`, not after `today`
pub fn parse_birth_date(value: &str, today: NaiveDate) -> BusinessResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BusinessError::validation("date_naissance", "format attendu AAAA-MM-JJ")
    })?;

    if date > today {
        return Err(BusinessError::validation(
            "date_naissance",
            "la date ne peut pas être dans le futur",
        ));
    }
    Ok(date)
}
