pub mod article;
pub mod docs;
pub mod model;
