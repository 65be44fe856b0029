pub mod classes;
pub mod date;

pub use classes::{id_of, name_of, LandCoverClass, CLASS_COUNT};
pub use date::DateLabel;
