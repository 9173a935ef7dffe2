//! Deferred resolution
//!
//! Some relationships can only be filled in once every record exists, for
//! example a staff group's member staves. Populators queue callbacks here
//! and the factory runs them once the whole document is decoded.

use std::collections::HashSet;

use crate::dom::Document;
use crate::error::Result;

type Resolver = Box<dyn FnOnce(&mut Document) -> Result<()>>;

/// Ordered queue of resolver callbacks, optionally deduplicated by key.
#[derive(Default)]
pub struct ElementLinker {
    resolvers: Vec<Resolver>,
    registered_keys: HashSet<String>,
}

impl ElementLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `resolver`. A second registration under the same key is ignored.
    pub fn add_resolver<F>(&mut self, resolver: F, key: Option<&str>)
    where
        F: FnOnce(&mut Document) -> Result<()> + 'static,
    {
        if let Some(key) = key {
            if !self.registered_keys.insert(key.to_string()) {
                return;
            }
        }
        self.resolvers.push(Box::new(resolver));
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Run every queued resolver in registration order, then forget them.
    /// Stops at the first error.
    pub fn resolve_all(&mut self, document: &mut Document) -> Result<()> {
        let resolvers = std::mem::take(&mut self.resolvers);
        self.registered_keys.clear();
        log::debug!("running {} deferred resolvers", resolvers.len());
        for resolver in resolvers {
            resolver(document)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ElementLinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementLinker")
            .field("resolvers", &self.resolvers.len())
            .field("registered_keys", &self.registered_keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::config::DecodeConfig;

    #[test]
    fn test_keyed_resolvers_run_once_in_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut linker = ElementLinker::new();
        for (label, key) in [("a", Some("shared")), ("b", None), ("c", Some("shared")), ("d", None)] {
            let calls = Rc::clone(&calls);
            linker.add_resolver(
                move |_doc: &mut Document| {
                    calls.borrow_mut().push(label);
                    Ok(())
                },
                key,
            );
        }
        assert_eq!(linker.len(), 3);

        let mut document = Document::empty(&DecodeConfig::default());
        linker.resolve_all(&mut document).unwrap();
        assert_eq!(*calls.borrow(), vec!["a", "b", "d"]);
        assert!(linker.is_empty());

        linker.resolve_all(&mut document).unwrap();
        assert_eq!(calls.borrow().len(), 3);
    }
}
