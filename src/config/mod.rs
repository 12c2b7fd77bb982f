mod mapping;
mod validate;

pub use mapping::{
    DimensionName, Mapping, MappingDraft, MappingTarget, UserDimensions, ALL_MAPPING_TARGETS,
};
pub use validate::{
    validate_dimension_draft, validated_mapping, FieldErrors, FormField, ValidationError,
};
