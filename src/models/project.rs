//! Project model.
//!
//! Projects are read from the project registry. The grid only needs enough
//! of a project to label its bars, color them, and seed the hour estimate
//! of a new drop.

use serde::{Deserialize, Serialize};

use super::ProjectId;

/// A project that can be scheduled into bays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Business-facing project number (e.g. `"P-1042"`).
    #[serde(default)]
    pub project_number: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Estimated total work in hours.
    #[serde(default)]
    pub total_hours: f64,
}

impl Project {
    /// Creates a new project with the given ID.
    pub fn new(id: ProjectId) -> Self {
        Self {
            id,
            project_number: String::new(),
            name: String::new(),
            total_hours: 0.0,
        }
    }

    /// Sets the project number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.project_number = number.into();
        self
    }

    /// Sets the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the hour estimate.
    pub fn with_hours(mut self, hours: f64) -> Self {
        self.total_hours = hours;
        self
    }

    /// Bar label: number and name when known.
    pub fn label(&self) -> String {
        match (self.project_number.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} {}", self.project_number, self.name),
            (false, true) => self.project_number.clone(),
            (true, false) => self.name.clone(),
            (true, true) => format!("Project {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_builder() {
        let p = Project::new(12)
            .with_number("P-1042")
            .with_name("Rescue Truck")
            .with_hours(640.0);

        assert_eq!(p.id, 12);
        assert!((p.total_hours - 640.0).abs() < 1e-10);
        assert_eq!(p.label(), "P-1042 Rescue Truck");
    }

    #[test]
    fn test_project_label_fallbacks() {
        assert_eq!(Project::new(5).label(), "Project 5");
        assert_eq!(Project::new(5).with_number("P-5").label(), "P-5");
        assert_eq!(Project::new(5).with_name("Pumper").label(), "Pumper");
    }
}
