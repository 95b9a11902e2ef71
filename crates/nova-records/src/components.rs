//! Rebuilding the `Record` attribute from the fields that back it.

use indexmap::IndexMap;
use nova_classfile::{ClassStub, FieldStub, RecordComponentStub};

/// Fields that back record components: final instance fields.
///
/// Visibility is ignored because optimizers may widen component fields that
/// were originally private.
pub fn component_fields(class: &ClassStub) -> impl Iterator<Item = &FieldStub> + '_ {
    class.fields.iter().filter(|field| field.is_final_instance())
}

/// Record components for `class`, one per component field in declaration
/// order. Duplicate name+descriptor pairs keep their first position.
pub fn synthesize_components(class: &ClassStub) -> Vec<RecordComponentStub> {
    let mut components: IndexMap<(&str, &str), RecordComponentStub> = IndexMap::new();
    for field in component_fields(class) {
        components
            .entry((field.name.as_str(), field.descriptor.as_str()))
            .or_insert_with(|| RecordComponentStub::from(field));
    }
    components.into_values().collect()
}
