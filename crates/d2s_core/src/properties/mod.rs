pub mod descriptor;
pub mod format;
pub mod overrides;

pub use descriptor::{CustomFormat, DescriptorMode, PropertyDescriptor, ValuePosition};
pub use format::{
    FormattedProperty, describe, format_item_properties, format_set_properties, group_attributes,
    sprintf,
};
