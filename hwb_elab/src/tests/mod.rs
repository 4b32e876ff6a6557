use crate::elab::elaborator::Elaborator;
use crate::elab::module::Module;
use crate::elab::signal::{ElementKind, SignalType};

mod builder;

pub fn uint(width: u32) -> SignalType {
    SignalType::Element(ElementKind::UInt(width))
}

pub fn sint(width: u32) -> SignalType {
    SignalType::Element(ElementKind::SInt(width))
}

pub fn boolean() -> SignalType {
    SignalType::Element(ElementKind::Bool)
}

pub fn analog(width: u32) -> SignalType {
    SignalType::Element(ElementKind::Analog(width))
}

/// A fresh elaborator with a root module and one child.
pub fn parent_child() -> (Elaborator, Module, Module) {
    let mut s = Elaborator::new();
    let parent = s.add_module("top");
    let child = s.add_child_module(parent, "sub");
    (s, parent, child)
}
