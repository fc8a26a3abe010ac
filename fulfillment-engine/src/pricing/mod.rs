//! Promotion pricing
//!
//! - **matcher**: is a promotion active on a given business date
//! - **validator**: authoritative server-side re-derivation of discounted
//!   prices; client-claimed prices are advisory only

pub mod matcher;
pub mod validator;

pub use validator::{validate_promotion, ValidatedPromotion};
