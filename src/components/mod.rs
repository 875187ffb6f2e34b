pub mod icons;
pub mod layout;
pub mod modal;
pub mod summary;
pub mod table;
