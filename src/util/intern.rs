use std::{collections::HashMap, fmt, num::NonZeroU32, rc::Rc};

/// A handle to an interned name. To retrieve the `&str`, use
/// [`Interner::get`].
///
/// Two symbols from the same interner are equal iff their names are equal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(NonZeroU32);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

pub struct Interner {
    map: HashMap<Rc<str>, Symbol>,
    vec: Vec<Rc<str>>,
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (i, name) in self.vec.iter().enumerate() {
            map.entry(&(i + 1), name);
        }
        map.finish()
    }
}

impl Interner {
    pub fn with_capacity(capacity: usize) -> Interner {
        Interner {
            map: HashMap::with_capacity(capacity),
            vec: Vec::with_capacity(capacity),
        }
    }

    /// Interns the provided name, returning a handle which can be used to
    /// retrieve it later.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&symbol) = self.map.get(name) {
            return symbol;
        }
        let index = u32::try_from(self.vec.len()).expect("interner out of capacity");
        // Offset by one to keep the niche.
        let symbol = Symbol(NonZeroU32::MIN.saturating_add(index));
        let key: Rc<str> = Rc::from(name);
        self.vec.push(Rc::clone(&key));
        self.map.insert(key, symbol);
        symbol
    }

    /// Returns the name behind the provided handle.
    ///
    /// Panics if the handle comes from another interner.
    pub fn get(&self, symbol: impl Into<Symbol>) -> &str {
        let Symbol(handle) = symbol.into();
        &self.vec[(handle.get() - 1) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interner() {
        let mut i = Interner::with_capacity(3);

        let hello1 = i.intern("hello");
        let world1 = i.intern("world");
        let hello2 = i.intern("hello");

        assert_eq!(hello1, hello2);
        assert_ne!(hello1, world1);
        assert_eq!(i.get(hello1), "hello");
        assert_eq!(i.get(world1), "world");
        assert_eq!(i.intern("world"), world1);
    }
}
