use std::collections::{hash_map::Entry, HashMap};

use crate::{types::Type, util::intern::Symbol};

/// Variable bindings of one lexical block, chained to the enclosing block.
///
/// A scope owns its bindings and only reads through its parent, so a child
/// scope lives strictly inside the analysis of its parent's block.
#[derive(Debug, Default)]
pub struct Scope<'parent> {
    parent: Option<&'parent Scope<'parent>>,
    bindings: HashMap<Symbol, Type>,
}

impl<'parent> Scope<'parent> {
    /// Creates a fresh top-level scope.
    pub fn root() -> Scope<'static> {
        Scope {
            parent: None,
            bindings: HashMap::new(),
        }
    }

    pub fn child(parent: &'parent Scope<'parent>) -> Scope<'parent> {
        Scope {
            parent: Some(parent),
            bindings: HashMap::new(),
        }
    }

    /// Binds `name` in this scope.
    ///
    /// Fails with the existing type if `name` is already bound in this exact
    /// scope. Bindings of enclosing scopes may be hidden; the code generator
    /// renames hiding locals.
    pub fn define(&mut self, name: Symbol, ty: Type) -> Result<(), Type> {
        match self.bindings.entry(name) {
            Entry::Occupied(existing) => Err(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(ty);
                Ok(())
            }
        }
    }

    /// Looks `name` up, walking outward through the enclosing scopes.
    pub fn lookup(&self, name: Symbol) -> Option<Type> {
        let mut curr = self;
        loop {
            if let Some(&ty) = curr.bindings.get(&name) {
                return Some(ty);
            }
            curr = curr.parent?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::intern::Interner;

    #[test]
    fn lookup_walks_outward() {
        let i = &mut Interner::with_capacity(4);
        let (x, y, z) = (i.intern("x"), i.intern("y"), i.intern("z"));

        let mut root = Scope::root();
        root.define(x, Type::Integer).unwrap();

        let mut child = Scope::child(&root);
        child.define(y, Type::String).unwrap();

        assert_eq!(child.lookup(x), Some(Type::Integer));
        assert_eq!(child.lookup(y), Some(Type::String));
        assert_eq!(child.lookup(z), None);
        assert_eq!(root.lookup(y), None);
    }

    #[test]
    fn duplicate_only_within_the_same_scope() {
        let i = &mut Interner::with_capacity(4);
        let x = i.intern("x");

        let mut root = Scope::root();
        root.define(x, Type::Integer).unwrap();
        assert_eq!(root.define(x, Type::String), Err(Type::Integer));

        let mut child = Scope::child(&root);
        child.define(x, Type::Boolean).unwrap();
        assert_eq!(child.lookup(x), Some(Type::Boolean));
        assert_eq!(root.lookup(x), Some(Type::Integer));
    }
}
