pub mod binding;
pub mod connect;
pub mod diagnostic;
pub mod elaborator;
pub mod ir;
pub mod module;
pub mod signal;
