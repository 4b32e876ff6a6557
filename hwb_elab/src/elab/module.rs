use crate::elab::elaborator::Elaborator;
use crate::new_index_type;

new_index_type!(pub Module);

/// A node in the strict module tree. The parent is fixed at construction,
/// only roots have none.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub name: String,
    pub parent: Option<Module>,
}

/// Relation of a module to the context module of a connection statement,
/// looking at most one level up on either side. Deeper ancestry is [ModuleRelation::Unrelated].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ModuleRelation {
    /// The module is the context module itself.
    Current,
    /// The module is a direct child of the context module.
    ChildOfContext,
    /// The module is the direct parent of the context module.
    ParentOfContext,
    /// The module and the context module share a direct parent.
    Sibling,
    Unrelated,
}

impl Elaborator {
    pub fn parent_of(&self, module: Module) -> Option<Module> {
        self.modules[module].parent
    }

    pub fn relation_to(&self, context: Module, other: Module) -> ModuleRelation {
        if other == context {
            ModuleRelation::Current
        } else if self.parent_of(other) == Some(context) {
            ModuleRelation::ChildOfContext
        } else if self.parent_of(context) == Some(other) {
            ModuleRelation::ParentOfContext
        } else if self.parent_of(context).is_some() && self.parent_of(context) == self.parent_of(other) {
            ModuleRelation::Sibling
        } else {
            ModuleRelation::Unrelated
        }
    }

    /// Dotted path of a module from its root, e.g. `top.core.alu`.
    pub fn module_path_string(&self, module: Module) -> String {
        let mut segments = vec![];
        let mut curr = Some(module);
        while let Some(m) = curr {
            segments.push(self.modules[m].name.as_str());
            curr = self.modules[m].parent;
        }
        segments.reverse();
        segments.join(".")
    }
}
