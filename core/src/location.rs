/// Bitfield describing where on a page a word was found.
///
/// ```text
/// [N:3] field index within the parent register
/// [2]   word came from enum member text
/// [1]   word came from a field node
/// [0]   word came from a name (otherwise a description)
/// ```
pub type LocationCode = u32;

const NAME_BIT: LocationCode = 1 << 0;
const FIELD_BIT: LocationCode = 1 << 1;
const ENUM_BIT: LocationCode = 1 << 2;
const FIELD_IDX_SHIFT: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub is_name: bool,
    pub is_field: bool,
    pub is_enum: bool,
    pub field_idx: u32,
}

impl Location {
    pub fn description(is_field: bool, field_idx: u32) -> Self {
        Self { is_field, field_idx, ..Self::default() }
    }

    pub fn name(is_field: bool, field_idx: u32) -> Self {
        Self { is_name: true, is_field, field_idx, ..Self::default() }
    }

    pub fn enum_name(field_idx: u32) -> Self {
        Self { is_name: true, is_field: true, is_enum: true, field_idx }
    }

    pub fn enum_description(field_idx: u32) -> Self {
        Self { is_name: false, is_field: true, is_enum: true, field_idx }
    }

    pub fn code(&self) -> LocationCode {
        LocationCode::from(self.is_name)
            | (LocationCode::from(self.is_field) << 1)
            | (LocationCode::from(self.is_enum) << 2)
            | (self.field_idx << FIELD_IDX_SHIFT)
    }

    pub fn decode(code: LocationCode) -> Self {
        Self {
            is_name: code & NAME_BIT != 0,
            is_field: code & FIELD_BIT != 0,
            is_enum: code & ENUM_BIT != 0,
            field_idx: code >> FIELD_IDX_SHIFT,
        }
    }
}
