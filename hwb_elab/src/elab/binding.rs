use crate::elab::module::Module;

/// The declared direction of a port, from the perspective of the module that owns it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

/// The effective read/write direction of a signal.
/// Derived from the binding, never stored separately.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Input,
    Output,
    Internal,
}

/// Identifier of a conditional (`when`) construct opened during elaboration.
/// Signals declared while the construct is open become scope-escaped once it closes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WhenScope(pub(crate) u64);

/// Construction-time metadata attached to every signal node.
/// Set exactly once when the signal is created and immutable afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Binding {
    pub kind: BindingKind,
    /// The innermost conditional scope that was open when the signal was declared, if any.
    pub when: Option<WhenScope>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingKind {
    Port { module: Module, direction: PortDirection },
    Wire { module: Module },
    Register { module: Module },
    MemPort { module: Module },
    Literal,
}

impl BindingKind {
    /// The module that declared the signal. Literals are not declared in any module.
    pub fn module(&self) -> Option<Module> {
        match *self {
            BindingKind::Port { module, .. } => Some(module),
            BindingKind::Wire { module } => Some(module),
            BindingKind::Register { module } => Some(module),
            BindingKind::MemPort { module } => Some(module),
            BindingKind::Literal => None,
        }
    }

    pub fn direction(&self) -> Direction {
        match *self {
            BindingKind::Port {
                direction: PortDirection::Input,
                ..
            } => Direction::Input,
            BindingKind::Port {
                direction: PortDirection::Output,
                ..
            } => Direction::Output,
            BindingKind::Wire { .. } | BindingKind::Register { .. } | BindingKind::MemPort { .. } => {
                Direction::Internal
            }
            // literals read as plain values
            BindingKind::Literal => Direction::Internal,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            BindingKind::Port {
                direction: PortDirection::Input,
                ..
            } => "input port",
            BindingKind::Port {
                direction: PortDirection::Output,
                ..
            } => "output port",
            BindingKind::Wire { .. } => "wire",
            BindingKind::Register { .. } => "register",
            BindingKind::MemPort { .. } => "memory port",
            BindingKind::Literal => "literal",
        }
    }
}
