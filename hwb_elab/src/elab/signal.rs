use crate::elab::binding::Binding;
use crate::elab::diagnostic::ElabError;
use crate::elab::elaborator::Elaborator;
use crate::elab::ir::IrSignalRef;
use crate::new_index_type;
use hwb_util::swrite;
use indexmap::IndexMap;
use itertools::Itertools;

new_index_type!(pub Signal);
new_index_type!(pub EnumDecl);

/// An enumerated type declaration, shared by every enum kind that refers to it.
#[derive(Debug, Clone)]
pub struct EnumDeclInfo {
    pub name: String,
    pub variants: usize,
}

/// The scalar kinds a leaf signal can have.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ElementKind {
    Clock,
    AsyncReset,
    SyncReset,
    Bool,
    UInt(u32),
    SInt(u32),
    Fixed { width: u32, point: u32 },
    /// `constrained: false` marks the unconstrained variant of the declaration,
    /// which can connect to and from any concrete variant of the same declaration.
    Enum { decl: EnumDecl, constrained: bool },
    /// Multi-driver bus kind, only connectable through the separate attach-style form.
    Analog(u32),
}

impl ElementKind {
    pub fn bit_width(&self, s: &Elaborator) -> u32 {
        match *self {
            ElementKind::Clock | ElementKind::AsyncReset | ElementKind::SyncReset | ElementKind::Bool => 1,
            ElementKind::UInt(width) | ElementKind::SInt(width) | ElementKind::Analog(width) => width,
            ElementKind::Fixed { width, .. } => width,
            ElementKind::Enum { decl, .. } => {
                let variants = s.enums[decl].variants.max(1);
                usize::BITS - (variants - 1).leading_zeros()
            }
        }
    }

    pub fn is_analog(&self) -> bool {
        matches!(self, ElementKind::Analog(_))
    }

    /// Whether a value of kind `source` may drive a sink of kind `self`.
    /// Identical kinds are connectable regardless of width, a single unsigned bit
    /// and a boolean are interchangeable, and the two enum variants of one
    /// declaration are connectable in both directions.
    pub fn connectable_from(&self, source: &ElementKind) -> bool {
        match (self, source) {
            (ElementKind::Clock, ElementKind::Clock) => true,
            (ElementKind::AsyncReset, ElementKind::AsyncReset) => true,
            (ElementKind::SyncReset, ElementKind::SyncReset) => true,
            (ElementKind::Bool, ElementKind::Bool) => true,
            (ElementKind::UInt(_), ElementKind::UInt(_)) => true,
            (ElementKind::SInt(_), ElementKind::SInt(_)) => true,
            (ElementKind::Fixed { .. }, ElementKind::Fixed { .. }) => true,
            (ElementKind::Bool, ElementKind::UInt(1)) => true,
            (ElementKind::UInt(1), ElementKind::Bool) => true,
            (ElementKind::Enum { decl: sink_decl, .. }, ElementKind::Enum { decl: source_decl, .. }) => {
                sink_decl == source_decl
            }
            _ => false,
        }
    }

    pub fn to_diagnostic_string(&self, s: &Elaborator) -> String {
        match *self {
            ElementKind::Clock => "clock".to_owned(),
            ElementKind::AsyncReset => "async_reset".to_owned(),
            ElementKind::SyncReset => "sync_reset".to_owned(),
            ElementKind::Bool => "bool".to_owned(),
            ElementKind::UInt(width) => format!("uint({width})"),
            ElementKind::SInt(width) => format!("sint({width})"),
            ElementKind::Fixed { width, point } => format!("fixed({width}, {point})"),
            ElementKind::Enum { decl, constrained } => {
                let name = &s.enums[decl].name;
                match constrained {
                    true => format!("enum {name}"),
                    false => format!("enum {name} (unconstrained)"),
                }
            }
            ElementKind::Analog(width) => format!("analog({width})"),
        }
    }
}

/// The type of a signal tree: a scalar element, a fixed-length vector or a record.
/// Vectors store one entry per element so mixed-element vectors stay expressible;
/// [SignalType::vector] builds the common homogeneous case.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SignalType {
    Element(ElementKind),
    Vector(Vec<SignalType>),
    Record(IndexMap<String, SignalType>),
}

impl SignalType {
    pub fn vector(element: SignalType, len: usize) -> SignalType {
        SignalType::Vector(vec![element; len])
    }

    /// Field insertion order is declaration order. Duplicate names are rejected.
    pub fn record(
        fields: impl IntoIterator<Item = (impl Into<String>, SignalType)>,
    ) -> Result<SignalType, ElabError> {
        let mut map = IndexMap::new();
        for (name, ty) in fields {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(ElabError::DuplicateField { field: name });
            }
            map.insert(name, ty);
        }
        Ok(SignalType::Record(map))
    }

    pub fn to_diagnostic_string(&self, s: &Elaborator) -> String {
        match self {
            SignalType::Element(kind) => kind.to_diagnostic_string(s),
            SignalType::Vector(elements) => {
                let homogeneous = elements.iter().all(|e| e == &elements[0]);
                match (elements.first(), homogeneous) {
                    (None, _) => "[]".to_owned(),
                    (Some(first), true) => {
                        format!("{}[{}]", first.to_diagnostic_string(s), elements.len())
                    }
                    (Some(_), false) => {
                        let inner = elements.iter().map(|e| e.to_diagnostic_string(s)).join(", ");
                        format!("[{inner}]")
                    }
                }
            }
            SignalType::Record(fields) => {
                let mut f = String::new();
                swrite!(&mut f, "{{");
                for (index, (name, ty)) in fields.iter().enumerate() {
                    if index != 0 {
                        swrite!(&mut f, ", ");
                    }
                    swrite!(&mut f, "{}: {}", name, ty.to_diagnostic_string(s));
                }
                swrite!(&mut f, "}}");
                f
            }
        }
    }
}

/// A single node of a constructed signal tree.
/// Aggregate children are arena nodes themselves, so every leaf carries
/// its own binding and its own low-level reference.
#[derive(Debug, Clone)]
pub struct SignalInfo {
    /// Full dotted name from the root signal, e.g. `io.data(0)`.
    pub name: String,
    pub binding: Binding,
    pub shape: SignalShape,
}

#[derive(Debug, Clone)]
pub enum SignalShape {
    Element { kind: ElementKind, ir: IrSignalRef },
    Vector(Vec<Signal>),
    Record(IndexMap<String, Signal>),
}
