pub mod field_key;
pub mod fs_atomic;
pub mod ids;
