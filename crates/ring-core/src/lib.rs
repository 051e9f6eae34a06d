pub mod assembly;
pub mod bounds;
pub mod common;
pub mod domain;
pub mod elements;
pub mod engine;
pub mod layout;
pub mod numerics;
pub mod validation;
