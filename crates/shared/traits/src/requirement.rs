use std::fmt;

/// A composable predicate describing a precondition for enabling or
/// disabling something — typically an extension — with a human-readable,
/// localizable-in-spirit summary.
///
/// The tree has three variants: a leaf predicate ([`RequirementLeaf`]),
/// [`AllRequirements`], and [`AnyRequirement`].
pub trait Requirement: fmt::Debug {
    /// Whether this requirement is currently met.
    fn is_met(&self) -> bool;

    /// A one-line, human-readable summary of this requirement.
    fn summary(&self) -> String;

    /// Optional multi-line elaboration rendered beneath the summary.
    fn details(&self) -> Option<String> {
        None
    }

    /// Render the requirement the way the CLI would print an unmet one:
    /// the summary, and if present, a separator line and the details.
    fn render(&self) -> String {
        let summary = self.summary();
        match self.details() {
            Some(details) => {
                format!("{summary}\n{}\n{details}", "-".repeat(summary.len()))
            }
            None => summary,
        }
    }
}

/// A single, named precondition with no further structure, e.g. "`npm` is
/// on PATH".
#[derive(Debug, Clone)]
pub struct RequirementLeaf {
    summary: String,
    met: bool,
    details: Option<String>,
}

impl RequirementLeaf {
    #[must_use]
    pub fn new(summary: impl Into<String>, met: bool) -> Self {
        Self {
            summary: summary.into(),
            met,
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Requirement for RequirementLeaf {
    fn is_met(&self) -> bool {
        self.met
    }

    fn summary(&self) -> String {
        self.summary.clone()
    }

    fn details(&self) -> Option<String> {
        self.details.clone()
    }
}

/// All child requirements must be met. Used for an extension's
/// `enable_requirement`, composed from its dependencies' requirements.
#[derive(Debug)]
pub struct AllRequirements {
    requirements: Vec<Box<dyn Requirement>>,
    summary: String,
}

impl AllRequirements {
    #[must_use]
    pub fn new(requirements: Vec<Box<dyn Requirement>>) -> Self {
        Self {
            requirements,
            summary: "All of these requirements must be met".to_string(),
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub fn requirements(&self) -> &[Box<dyn Requirement>] {
        &self.requirements
    }
}

impl Requirement for AllRequirements {
    fn is_met(&self) -> bool {
        self.requirements.iter().all(|r| r.is_met())
    }

    fn summary(&self) -> String {
        self.summary.clone()
    }

    fn render(&self) -> String {
        let mut out = self.summary();
        for requirement in &self.requirements {
            for line in requirement.render().lines() {
                out.push_str("\n  ");
                out.push_str(line);
            }
        }
        out
    }
}

/// At least one child requirement must be met.
#[derive(Debug)]
pub struct AnyRequirement {
    requirements: Vec<Box<dyn Requirement>>,
    summary: String,
}

impl AnyRequirement {
    #[must_use]
    pub fn new(requirements: Vec<Box<dyn Requirement>>) -> Self {
        Self {
            requirements,
            summary: "One or more of these requirements must be met".to_string(),
        }
    }

    #[must_use]
    pub fn requirements(&self) -> &[Box<dyn Requirement>] {
        &self.requirements
    }
}

impl Requirement for AnyRequirement {
    fn is_met(&self) -> bool {
        self.requirements.iter().any(|r| r.is_met())
    }

    fn summary(&self) -> String {
        self.summary.clone()
    }

    fn render(&self) -> String {
        let mut out = self.summary();
        for requirement in &self.requirements {
            for line in requirement.render().lines() {
                out.push_str("\n  ");
                out.push_str(line);
            }
        }
        out
    }
}
