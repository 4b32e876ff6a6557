use crate::elab::binding::{Binding, BindingKind, Direction, PortDirection, WhenScope};
use crate::elab::diagnostic::ElabError;
use crate::elab::ir::{IrOp, IrSignalRef};
use crate::elab::module::{Module, ModuleInfo};
use crate::elab::signal::{ElementKind, EnumDecl, EnumDeclInfo, Signal, SignalInfo, SignalShape, SignalType};
use crate::throw;
use crate::util::arena::Arena;
use indexmap::IndexMap;

/// All state for one in-progress circuit elaboration: the module tree, the
/// constructed signal trees, the open conditional scopes and the ordered log
/// of emitted low-level operations.
///
/// One instance per circuit being built. Concurrent elaborations must use
/// independent instances, nothing here is shared or global.
pub struct Elaborator {
    pub modules: Arena<Module, ModuleInfo>,
    pub signals: Arena<Signal, SignalInfo>,
    pub enums: Arena<EnumDecl, EnumDeclInfo>,

    pub(crate) ops: Vec<IrOp>,
    open_whens: Vec<WhenScope>,
    next_when: u64,
    next_ref: u32,
}

impl Elaborator {
    pub fn new() -> Self {
        Elaborator {
            modules: Arena::default(),
            signals: Arena::default(),
            enums: Arena::default(),
            ops: vec![],
            open_whens: vec![],
            next_when: 0,
            next_ref: 0,
        }
    }

    /// The operations emitted so far, in statement order.
    pub fn ops(&self) -> &[IrOp] {
        &self.ops
    }

    pub fn add_module(&mut self, name: impl Into<String>) -> Module {
        self.modules.push(ModuleInfo {
            name: name.into(),
            parent: None,
        })
    }

    pub fn add_child_module(&mut self, parent: Module, name: impl Into<String>) -> Module {
        // index the arena first so an index from a different elaborator is caught
        let _ = &self.modules[parent];
        self.modules.push(ModuleInfo {
            name: name.into(),
            parent: Some(parent),
        })
    }

    pub fn add_enum_decl(&mut self, name: impl Into<String>, variants: usize) -> EnumDecl {
        self.enums.push(EnumDeclInfo {
            name: name.into(),
            variants,
        })
    }

    pub fn add_port(
        &mut self,
        module: Module,
        name: impl Into<String>,
        direction: PortDirection,
        ty: &SignalType,
    ) -> Signal {
        let binding = Binding {
            kind: BindingKind::Port { module, direction },
            when: self.current_when(),
        };
        self.add_signal_tree(name.into(), ty, binding)
    }

    pub fn add_wire(&mut self, module: Module, name: impl Into<String>, ty: &SignalType) -> Signal {
        let binding = Binding {
            kind: BindingKind::Wire { module },
            when: self.current_when(),
        };
        self.add_signal_tree(name.into(), ty, binding)
    }

    pub fn add_register(&mut self, module: Module, name: impl Into<String>, ty: &SignalType) -> Signal {
        let binding = Binding {
            kind: BindingKind::Register { module },
            when: self.current_when(),
        };
        self.add_signal_tree(name.into(), ty, binding)
    }

    pub fn add_mem_port(&mut self, module: Module, name: impl Into<String>, ty: &SignalType) -> Signal {
        let binding = Binding {
            kind: BindingKind::MemPort { module },
            when: self.current_when(),
        };
        self.add_signal_tree(name.into(), ty, binding)
    }

    /// Literals are plain values: they have no declaring module and no
    /// conditional scope, and they are readable from anywhere.
    pub fn add_literal(&mut self, kind: ElementKind) -> Signal {
        let name = format!("literal {}", kind.to_diagnostic_string(self));
        let ir = self.new_ir_ref();
        self.signals.push(SignalInfo {
            name,
            binding: Binding {
                kind: BindingKind::Literal,
                when: None,
            },
            shape: SignalShape::Element { kind, ir },
        })
    }

    fn add_signal_tree(&mut self, name: String, ty: &SignalType, binding: Binding) -> Signal {
        let shape = match ty {
            SignalType::Element(kind) => {
                let ir = self.new_ir_ref();
                SignalShape::Element { kind: kind.clone(), ir }
            }
            SignalType::Vector(elements) => {
                let mut children = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    children.push(self.add_signal_tree(format!("{name}({index})"), element, binding));
                }
                SignalShape::Vector(children)
            }
            SignalType::Record(fields) => {
                let mut children = IndexMap::with_capacity(fields.len());
                for (field, element) in fields {
                    let child = self.add_signal_tree(format!("{name}.{field}"), element, binding);
                    children.insert(field.clone(), child);
                }
                SignalShape::Record(children)
            }
        };
        self.signals.push(SignalInfo { name, binding, shape })
    }

    fn new_ir_ref(&mut self) -> IrSignalRef {
        let ir = IrSignalRef::new(self.next_ref);
        self.next_ref += 1;
        ir
    }

    /// Opens a conditional construct. Signals declared until the matching
    /// [Elaborator::when_close] record this scope and become scope-escaped
    /// once it closes.
    pub fn when_open(&mut self) -> WhenScope {
        let scope = WhenScope(self.next_when);
        self.next_when += 1;
        self.open_whens.push(scope);
        scope
    }

    /// Closes a conditional construct. Scopes are strictly nested,
    /// only the innermost open scope can be closed.
    pub fn when_close(&mut self, scope: WhenScope) -> Result<(), ElabError> {
        if self.open_whens.last() != Some(&scope) {
            throw!(ElabError::WhenClosedOutOfOrder);
        }
        self.open_whens.pop();
        Ok(())
    }

    fn current_when(&self) -> Option<WhenScope> {
        self.open_whens.last().copied()
    }

    /// False iff the signal was declared inside a conditional construct that
    /// has since closed.
    pub fn is_conditionally_visible(&self, signal: Signal) -> bool {
        match self.signals[signal].binding.when {
            None => true,
            Some(scope) => self.open_whens.contains(&scope),
        }
    }

    pub fn signal_direction(&self, signal: Signal) -> Direction {
        self.signals[signal].binding.kind.direction()
    }

    pub fn signal_module(&self, signal: Signal) -> Option<Module> {
        self.signals[signal].binding.kind.module()
    }

    /// Reconstructs the type of a signal tree from its shape.
    pub fn signal_type(&self, signal: Signal) -> SignalType {
        match &self.signals[signal].shape {
            SignalShape::Element { kind, .. } => SignalType::Element(kind.clone()),
            SignalShape::Vector(children) => {
                SignalType::Vector(children.iter().map(|&c| self.signal_type(c)).collect())
            }
            SignalShape::Record(children) => SignalType::Record(
                children
                    .iter()
                    .map(|(name, &c)| (name.clone(), self.signal_type(c)))
                    .collect(),
            ),
        }
    }

    /// The low-level reference of an element leaf, none for aggregates.
    pub fn signal_ir(&self, signal: Signal) -> Option<IrSignalRef> {
        match &self.signals[signal].shape {
            SignalShape::Element { ir, .. } => Some(*ir),
            SignalShape::Vector(_) | SignalShape::Record(_) => None,
        }
    }

    pub fn signal_field(&self, signal: Signal, field: &str) -> Option<Signal> {
        match &self.signals[signal].shape {
            SignalShape::Record(children) => children.get(field).copied(),
            SignalShape::Element { .. } | SignalShape::Vector(_) => None,
        }
    }

    pub fn signal_index(&self, signal: Signal, index: usize) -> Option<Signal> {
        match &self.signals[signal].shape {
            SignalShape::Vector(children) => children.get(index).copied(),
            SignalShape::Element { .. } | SignalShape::Record(_) => None,
        }
    }
}
