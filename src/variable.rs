use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Field;

/// Descriptive role of a variable in an analysis. Never affects layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Explanatory,
    Response,
    Other,
}

/// Whether a variable stores a binary number or padded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Categorical,
    Quantitative,
}

impl Kind {
    /// Returns a lower-case name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Categorical => "categorical",
            Kind::Quantitative => "quantitative",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Named, typed column definition shared by every row of a data set.
///
/// The offset is owned by the enclosing [`Schema`](crate::Schema): it is
/// recomputed whenever a schema is built, so the value given here is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    #[serde(default)]
    role: Role,
    kind: Kind,
    width: usize,
    #[serde(default, skip_serializing)]
    offset: usize,
}

impl Variable {
    pub fn new(name: impl Into<String>, role: Role, kind: Kind, width: usize) -> Self {
        Self {
            name: name.into(),
            role,
            kind,
            width,
            offset: 0,
        }
    }

    /// Quantitative variable sized for the value type `Q`.
    pub fn quantitative<Q: Field>(name: impl Into<String>) -> Self {
        Self::new(name, Role::Explanatory, Kind::Quantitative, Q::WIDTH)
    }

    /// Categorical variable holding at most `width` bytes of text.
    pub fn categorical(name: impl Into<String>, width: usize) -> Self {
        Self::new(name, Role::Explanatory, Kind::Categorical, width)
    }

    /// Builder-style role assignment.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Byte range of this variable inside a row.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }
}

/// Identifies a column by name, position or descriptor.
#[derive(Debug, Clone, Copy)]
pub enum ColumnRef<'a> {
    Name(&'a str),
    Index(usize),
    Variable(&'a Variable),
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl<'a> From<&'a Variable> for ColumnRef<'a> {
    fn from(variable: &'a Variable) -> Self {
        ColumnRef::Variable(variable)
    }
}
