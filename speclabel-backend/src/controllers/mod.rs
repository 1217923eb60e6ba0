pub mod catalog;
pub mod images;
pub mod labels;
pub mod status;
