pub mod admin;
pub mod article;
pub mod auth;
pub mod contact;
pub mod docs;
pub mod recipe;
pub mod toddler;

mod model;

pub use model::{IdInput, Paginate};
