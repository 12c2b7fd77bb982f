use super::{DimensionName, Mapping, MappingDraft, UserDimensions};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Name,
    TargetType,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::TargetType => "target_type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    FieldRequired,
    DuplicateName,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::FieldRequired => write!(f, "this field is required"),
            ValidationError::DuplicateName => {
                write!(f, "a dimension with this name already exists")
            }
        }
    }
}

/// Per-field validation errors. Backed by an ordered map so two runs over the
/// same input compare equal regardless of rule evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<FormField, Vec<ValidationError>>,
}

impl FieldErrors {
    pub fn add(&mut self, field: FormField, error: ValidationError) {
        self.errors.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, field: FormField) -> &[ValidationError] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &[ValidationError])> {
        self.errors
            .iter()
            .map(|(field, errors)| (*field, errors.as_slice()))
    }
}

/// Checks a candidate edit against the current collection. All applicable
/// rules are reported together; nothing short-circuits. Pure: safe to re-run
/// on every keystroke.
pub fn validate_dimension_draft(
    draft: &MappingDraft,
    dimensions: &UserDimensions,
    original_name: &DimensionName,
) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if draft.name.is_empty() {
        errors.add(FormField::Name, ValidationError::FieldRequired);
    }

    // Renaming a dimension to its own current name is not a collision.
    if !draft.name.is_empty()
        && draft.name != *original_name.as_str()
        && dimensions.contains(&draft.name)
    {
        errors.add(FormField::Name, ValidationError::DuplicateName);
    }

    if draft.target.is_none() {
        errors.add(FormField::TargetType, ValidationError::FieldRequired);
    }

    errors
}

/// Runs the same rules and materializes the mapping when the draft is clean.
pub fn validated_mapping(
    draft: &MappingDraft,
    dimensions: &UserDimensions,
    original_name: &DimensionName,
) -> Result<Mapping, FieldErrors> {
    let errors = validate_dimension_draft(draft, dimensions, original_name);
    if !errors.is_empty() {
        return Err(errors);
    }
    let name = DimensionName::parse(&draft.name).map_err(|_| {
        let mut errors = FieldErrors::default();
        errors.add(FormField::Name, ValidationError::FieldRequired);
        errors
    })?;
    let Some(target) = draft.target else {
        let mut errors = FieldErrors::default();
        errors.add(FormField::TargetType, ValidationError::FieldRequired);
        return Err(errors);
    };
    Ok(Mapping { name, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingTarget;

    fn dimensions() -> UserDimensions {
        UserDimensions::from_mappings(vec![
            Mapping {
                name: DimensionName::parse("Dept").expect("name"),
                target: MappingTarget::Tag,
            },
            Mapping {
                name: DimensionName::parse("Loc").expect("name"),
                target: MappingTarget::Tag,
            },
        ])
        .expect("dimensions")
    }

    fn editing(name: &str) -> DimensionName {
        DimensionName::parse(name).expect("name")
    }

    #[test]
    fn empty_name_is_required_regardless_of_target() {
        let dims = dimensions();
        for target in [None, Some(MappingTarget::Tag)] {
            let draft = MappingDraft {
                name: String::new(),
                target,
            };
            let errors = validate_dimension_draft(&draft, &dims, &editing("Dept"));
            assert_eq!(
                errors.field(FormField::Name),
                &[ValidationError::FieldRequired]
            );
        }
    }

    #[test]
    fn rename_onto_other_entry_is_duplicate_but_self_rename_is_not() {
        let dims = dimensions();
        let draft = MappingDraft {
            name: "Loc".to_string(),
            target: Some(MappingTarget::ReportField),
        };

        let errors = validate_dimension_draft(&draft, &dims, &editing("Dept"));
        assert_eq!(
            errors.field(FormField::Name),
            &[ValidationError::DuplicateName]
        );

        let errors = validate_dimension_draft(&draft, &dims, &editing("Loc"));
        assert!(errors.field(FormField::Name).is_empty());
    }

    #[test]
    fn missing_target_and_empty_name_are_reported_together() {
        let dims = dimensions();
        let draft = MappingDraft::default();
        let errors = validate_dimension_draft(&draft, &dims, &editing("Dept"));
        assert_eq!(
            errors.field(FormField::Name),
            &[ValidationError::FieldRequired]
        );
        assert_eq!(
            errors.field(FormField::TargetType),
            &[ValidationError::FieldRequired]
        );
    }

    #[test]
    fn validate_is_deterministic() {
        let dims = dimensions();
        let draft = MappingDraft {
            name: "Loc".to_string(),
            target: None,
        };
        let first = validate_dimension_draft(&draft, &dims, &editing("Dept"));
        let second = validate_dimension_draft(&draft, &dims, &editing("Dept"));
        assert_eq!(first, second);
    }

    #[test]
    fn validated_mapping_materializes_clean_draft() {
        let dims = dimensions();
        let draft = MappingDraft {
            name: "Department".to_string(),
            target: Some(MappingTarget::ReportField),
        };
        let mapping = validated_mapping(&draft, &dims, &editing("Dept")).expect("mapping");
        assert_eq!(mapping.name.as_str(), "Department");
        assert_eq!(mapping.target, MappingTarget::ReportField);

        let invalid = MappingDraft::default();
        assert!(validated_mapping(&invalid, &dims, &editing("Dept")).is_err());
    }
}
