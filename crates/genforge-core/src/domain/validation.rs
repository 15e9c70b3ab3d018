use crate::domain::{
    entities::{
        GenerationTemplate,
        constraints::{ConstraintReport, ProjectConstraints},
    },
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation entry points live here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_constraints(constraints: &ProjectConstraints) -> ConstraintReport {
        constraints.validate()
    }

    pub fn validate_template(template: &GenerationTemplate) -> Result<(), DomainError> {
        template.validate()
    }

    /// Project names become a single directory under the output root.
    pub fn validate_project_name(name: &str) -> Result<(), String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("Project name cannot be empty".into());
        }
        if trimmed == "." || trimmed == ".." {
            return Err(format!("Project name '{trimmed}' is not a directory name"));
        }
        if trimmed.contains(['/', '\\']) {
            return Err(format!(
                "Project name '{trimmed}' must not contain path separators"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names() {
        assert!(DomainValidator::validate_project_name("Demo").is_ok());
        assert!(DomainValidator::validate_project_name("my app").is_ok());
        assert!(DomainValidator::validate_project_name("  ").is_err());
        assert!(DomainValidator::validate_project_name("..").is_err());
        assert!(DomainValidator::validate_project_name("a/b").is_err());
    }
}
