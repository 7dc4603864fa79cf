//! Name resolution against everything built so far.

use std::collections::BTreeMap;

use cassowary_system_core::error::Result;
use cassowary_system_core::{BuiltPrimitive, CompileError, Expression, QuantityTable};

/// Read-only view of built quantities, built formulas, and pre-built
/// expressions.
///
/// Built names shadow pre-built ones.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub quantities: &'a QuantityTable,
    pub formulas: &'a BTreeMap<String, Expression>,
    pub prebuilt: &'a BTreeMap<String, Expression>,
}

impl<'a> Scope<'a> {
    pub fn new(
        quantities: &'a QuantityTable,
        formulas: &'a BTreeMap<String, Expression>,
        prebuilt: &'a BTreeMap<String, Expression>,
    ) -> Self {
        Self {
            quantities,
            formulas,
            prebuilt,
        }
    }

    /// Resolves a reference to an expression.
    ///
    /// A quantity is wrapped in a single-term expression.
    pub fn lookup(&self, name: &str) -> Result<Expression> {
        if let Some(id) = self.quantities.id(name) {
            return Ok(Expression::quantity(id));
        }
        self.formulas
            .get(name)
            .or_else(|| self.prebuilt.get(name))
            .cloned()
            .ok_or_else(|| CompileError::MissingReference {
                name: name.to_string(),
            })
    }

    /// Passes a built primitive through as an expression.
    ///
    /// Every quantity the primitive mentions must exist in this scope.
    pub fn primitive(&self, primitive: &BuiltPrimitive) -> Result<Expression> {
        let expr = match primitive {
            BuiltPrimitive::Quantity(id) => Expression::quantity(*id),
            BuiltPrimitive::Expression(expr) => expr.clone(),
            BuiltPrimitive::Strength(strength) => {
                return Err(CompileError::UnresolvableTerm(format!(
                    "strength '{strength}' is not an expression"
                )))
            }
        };
        if let Some(unknown) = expr.quantities().find(|&id| !self.quantities.contains(id)) {
            return Err(CompileError::MissingReference {
                name: unknown.to_string(),
            });
        }
        Ok(expr)
    }
}
