use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::variable::{ColumnRef, Kind, Role, Variable};

/// Ordered list of variables defining the physical layout of a row.
///
/// Column order is both the canonical order and the packing order: each
/// variable's offset is the sum of the widths before it. Offsets are
/// recomputed on every construction, so a `Schema` value is always packed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Variable>", into = "Vec<Variable>")]
pub struct Schema {
    variables: Vec<Variable>,
}

impl Schema {
    /// Builds a schema, assigning offsets as running sums in column order.
    ///
    /// Fails with [`DataError::InvalidSchema`] when `variables` is empty or
    /// contains a duplicate name.
    pub fn new(mut variables: Vec<Variable>) -> DataResult<Self> {
        if variables.is_empty() {
            return Err(DataError::invalid_schema("a schema needs at least one variable"));
        }
        let mut seen = HashSet::with_capacity(variables.len());
        for variable in &variables {
            if !seen.insert(variable.name()) {
                return Err(DataError::invalid_schema(format!(
                    "duplicate variable name '{}'",
                    variable.name()
                )));
            }
        }
        let mut offset = 0;
        for variable in &mut variables {
            variable.set_offset(offset);
            offset += variable.width();
        }
        Ok(Self { variables })
    }

    /// Returns the variable called `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    /// Returns the column position of `name`, if any.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name() == name)
    }

    /// Returns the variable at column `index`.
    pub fn variable(&self, index: usize) -> DataResult<&Variable> {
        self.variables
            .get(index)
            .ok_or_else(|| DataError::out_of_range(index, self.variables.len()))
    }

    /// Resolves a column reference against this schema.
    ///
    /// Descriptors must be members of the schema (full value equality), so a
    /// variable taken from another schema never reads foreign offsets.
    pub fn resolve<'a>(&self, column: impl Into<ColumnRef<'a>>) -> DataResult<&Variable> {
        match column.into() {
            ColumnRef::Name(name) => self.lookup(name).ok_or_else(|| DataError::not_found(name)),
            ColumnRef::Index(index) => self.variable(index),
            ColumnRef::Variable(variable) => self
                .variables
                .iter()
                .find(|v| *v == variable)
                .ok_or_else(|| DataError::not_found(variable.name())),
        }
    }

    /// Total byte width of a row.
    pub fn row_width(&self) -> usize {
        self.variables.iter().map(Variable::width).sum()
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Always `false`: a schema holds at least one variable.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    /// Returns the variable names in column order.
    pub fn names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name().to_string()).collect()
    }

    /// Returns `true` when every variable has the given kind.
    pub fn all_of_kind(&self, kind: Kind) -> bool {
        self.variables.iter().all(|v| v.kind() == kind)
    }

    /// Changes the role of a member variable. Layout is unaffected.
    pub fn set_role<'a>(&mut self, column: impl Into<ColumnRef<'a>>, role: Role) -> DataResult<()> {
        let name = self.resolve(column)?.name().to_string();
        if let Some(variable) = self.variables.iter_mut().find(|v| v.name() == name) {
            variable.set_role(role);
        }
        Ok(())
    }

    /// Returns a new schema without `variable`.
    ///
    /// Variables that followed the removed one move down by its width; column
    /// order is otherwise preserved. Removing the last variable is an
    /// [`DataError::InvalidSchema`].
    pub fn drop_variable(&self, variable: &Variable) -> DataResult<Schema> {
        if !self.variables.contains(variable) {
            return Err(DataError::not_found(variable.name()));
        }
        let remaining = self
            .variables
            .iter()
            .filter(|v| *v != variable)
            .cloned()
            .collect();
        Schema::new(remaining)
    }

    /// Returns a new schema with `variable` appended at offset `row_width()`.
    pub fn add_variable(&self, variable: Variable) -> DataResult<Schema> {
        let mut variables = self.variables.clone();
        variables.push(variable);
        Schema::new(variables)
    }
}

impl TryFrom<Vec<Variable>> for Schema {
    type Error = DataError;

    fn try_from(variables: Vec<Variable>) -> Result<Self, Self::Error> {
        Schema::new(variables)
    }
}

impl From<Schema> for Vec<Variable> {
    fn from(schema: Schema) -> Self {
        schema.variables
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
