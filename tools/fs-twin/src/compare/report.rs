use std::fmt;
use std::path::PathBuf;

use super::diff::{pretty_text, Mismatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Expected => write!(f, "expected"),
            Side::Actual => write!(f, "actual"),
        }
    }
}

/// One difference found between an expected and an actual tree or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// Some of `path` could not be read; `message` lists every failure.
    Unreadable {
        side: Side,
        path: PathBuf,
        message: String,
    },
    Missing { name: String },
    Extra { name: String },
    Modified { name: String, mismatch: Mismatch },
}

impl Discrepancy {
    /// Single line rendering, with modifications shown inline instead of as a unified diff.
    pub fn inline(&self) -> String {
        match self {
            Discrepancy::Modified { name, mismatch } => {
                format!("{} is different from expected: {}", name, pretty_text(&mismatch.segments))
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::Unreadable { side, path, message } => write!(
                f,
                "failed to completely read {} {}: {}",
                side,
                path.display(),
                message
            ),
            Discrepancy::Missing { name } => write!(f, "{} missing from actual directory", name),
            Discrepancy::Extra { name } => write!(
                f,
                "{} is present in actual directory but not in expected one",
                name
            ),
            Discrepancy::Modified { name, mismatch } => {
                write!(f, "{} is different from expected:\n{}", name, mismatch.unified)
            }
        }
    }
}

/// Every discrepancy found by one comparison, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    discrepancies: Vec<Discrepancy>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, discrepancy: Discrepancy) {
        self.discrepancies.push(discrepancy);
    }

    pub fn is_empty(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn discrepancies(&self) -> &[Discrepancy] {
        &self.discrepancies
    }

    pub fn missing(&self) -> Vec<&str> {
        self.discrepancies
            .iter()
            .filter_map(|d| match d {
                Discrepancy::Missing { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn extra(&self) -> Vec<&str> {
        self.discrepancies
            .iter()
            .filter_map(|d| match d {
                Discrepancy::Extra { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn modified(&self) -> Vec<&str> {
        self.discrepancies
            .iter()
            .filter_map(|d| match d {
                Discrepancy::Modified { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Panics with every discrepancy when the report is not empty.
    #[track_caller]
    pub fn assert(&self) {
        if !self.is_empty() {
            panic!("{}", self);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} discrepancies found", self.discrepancies.len())?;
        for discrepancy in &self.discrepancies {
            write!(f, "\n- {}", discrepancy)?;
        }
        Ok(())
    }
}
