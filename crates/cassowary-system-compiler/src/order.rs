//! Dependency ordering of named quantities and formulas.
//!
//! Names are visited in key order, so the plan depends only on the
//! reference graph and never on how the input tables were filled.
//! Quantity-shaped and pre-built terms come first; each formula follows
//! the names it references, first-discovered first.


use std::collections::{BTreeMap, HashSet};

use cassowary_system_core::error::Result;
use cassowary_system_core::{CompileError, RawTerm, TermKind};
use tracing::trace;

/// Linear build order produced by [`order`].
///
/// Every name referenced by a formula appears before that formula, unless
/// it is not defined in the ordered tables at all (it must then be
/// pre-built).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    names: Vec<String>,
}

impl BuildPlan {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IntoIterator for BuildPlan {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

/// Computes the build order of a name-to-term table.
///
/// # Errors
///
/// - [`CompileError::AtomicReference`] for a name defined as a bare reference
/// - [`CompileError::SelfReference`] for a formula mentioning its own name
/// - [`CompileError::CyclicReference`] for formulas referencing each other
pub fn order(terms: &BTreeMap<&str, &RawTerm>) -> Result<BuildPlan> {
    let mut orderer = Orderer {
        terms,
        names: Vec::with_capacity(terms.len()),
        placed: HashSet::with_capacity(terms.len()),
        visiting: Vec::new(),
    };

    for (&name, &term) in terms {
        match term.classify()? {
            TermKind::Formula(_) => {}
            TermKind::Reference(reference) => {
                return Err(CompileError::AtomicReference {
                    name: name.to_string(),
                    reference: reference.to_string(),
                })
            }
            TermKind::Token(token) => {
                return Err(CompileError::UnresolvableTerm(format!(
                    "'{name}' is defined as the token '{token}'"
                )))
            }
            _ => orderer.place(name),
        }
    }

    for (&name, &term) in terms {
        if let RawTerm::Formula(elements) = term {
            orderer.visit(name, elements)?;
        }
    }

    Ok(BuildPlan {
        names: orderer.names,
    })
}

struct Orderer<'a> {
    terms: &'a BTreeMap<&'a str, &'a RawTerm>,
    names: Vec<String>,
    placed: HashSet<&'a str>,
    visiting: Vec<&'a str>,
}

impl<'a> Orderer<'a> {
    fn place(&mut self, name: &'a str) {
        if self.placed.insert(name) {
            trace!(name, position = self.names.len(), "placed");
            self.names.push(name.to_string());
        }
    }

    fn visit(&mut self, name: &'a str, elements: &'a [RawTerm]) -> Result<()> {
        if self.placed.contains(name) {
            return Ok(());
        }
        if let Some(start) = self.visiting.iter().position(|&n| n == name) {
            let mut chain: Vec<String> = self.visiting[start..]
                .iter()
                .map(|n| n.to_string())
                .collect();
            chain.push(name.to_string());
            return Err(CompileError::CyclicReference { chain });
        }

        let mut dependencies = Vec::new();
        collect_dependencies(name, elements, &mut dependencies)?;

        let terms = self.terms;
        self.visiting.push(name);
        for dependency in dependencies {
            // Names outside the table must be pre-built; atomic names are
            // already placed.
            if let Some((&key, &&RawTerm::Formula(ref inner))) = terms.get_key_value(dependency) {
                self.visit(key, inner)?;
            }
        }
        self.visiting.pop();

        self.place(name);
        Ok(())
    }
}

// Every reference string anywhere in the array, in first-seen order.
fn collect_dependencies<'a>(
    owner: &str,
    elements: &'a [RawTerm],
    dependencies: &mut Vec<&'a str>,
) -> Result<()> {
    for element in elements {
        match element {
            RawTerm::Formula(inner) => collect_dependencies(owner, inner, dependencies)?,
            RawTerm::Reference(reference) => {
                if reference == owner {
                    return Err(CompileError::SelfReference {
                        name: owner.to_string(),
                    });
                }
                if !dependencies.contains(&reference.as_str()) {
                    dependencies.push(reference.as_str());
                }
            }
            _ => {}
        }
    }
    Ok(())
}
