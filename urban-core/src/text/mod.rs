pub mod builtin;
pub mod catalog;
pub mod provider;
pub mod resolver;
pub mod shaper;
