//! Enrollments
//!
//! An `Inscription` ties a student to a program and level for one academic
//! year, and moves through a small status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{BusinessError, BusinessResult};
use super::student::Level;

/// Academic year, e.g. `2025-2026`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear(u16);

impl AcademicYear {
    pub fn starting(year: u16) -> Self {
        Self(year)
    }

    pub fn start_year(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, u32::from(self.0) + 1)
    }
}

impl FromStr for AcademicYear {
    type Err = BusinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            BusinessError::validation("annee_academique", format!("format attendu AAAA-AAAA, reçu '{}'", s))
        };

        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let four_digits = |part: &str| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit());
        if !four_digits(start) || !four_digits(end) {
            return Err(invalid());
        }
        let start: u16 = start.parse().map_err(|_| invalid())?;
        let end: u16 = end.parse().map_err(|_| invalid())?;

        if end != start + 1 {
            return Err(BusinessError::validation(
                "annee_academique",
                format!("{} doit suivre directement {}", end, start),
            ));
        }
        Ok(Self(start))
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = BusinessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> Self {
        year.to_string()
    }
}

/// Enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
    Validated,
    Cancelled,
}

impl EnrollmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "En attente",
            EnrollmentStatus::Validated => "Validée",
            EnrollmentStatus::Cancelled => "Annulée",
        }
    }

    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, next),
            (Pending, Validated) | (Pending, Cancelled) | (Validated, Cancelled)
        )
    }

    /// Active enrollments count against the one-per-year rule
    pub fn is_active(&self) -> bool {
        !matches!(self, EnrollmentStatus::Cancelled)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Enrollment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: u64,
    pub student_id: u64,
    pub academic_year: AcademicYear,
    pub program: String,
    pub level: Level,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn create(id: u64, input: NewEnrollment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            student_id: input.student_id,
            academic_year: input.academic_year,
            program: input.program,
            level: input.level,
            status: EnrollmentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(&mut self, next: EnrollmentStatus, now: DateTime<Utc>) -> BusinessResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(BusinessError::validation(
                "statut",
                format!("transition '{}' -> '{}' interdite", self.status, next),
            )
            .with_parameter(self.id));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

/// Raw enrollment request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentInput {
    pub student_id: u64,
    pub academic_year: String,
    /// Defaults to the student's current program
    #[serde(default)]
    pub program: Option<String>,
    /// Defaults to the student's current level
    #[serde(default)]
    pub level: Option<String>,
}

/// Validated enrollment data
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub student_id: u64,
    pub academic_year: AcademicYear,
    pub program: String,
    pub level: Level,
}
