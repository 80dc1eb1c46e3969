use std::rc::Rc;

use super::types::{ClassType, FunctionType, Type};

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub var_type: Type,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
}

impl Function {
    pub fn signature(&self) -> FunctionType {
        FunctionType::new(self.parameter_types.clone(), self.return_type.clone())
    }
}

/// A named binding produced by a declaration.
///
/// Entities are shared between the scope that declared them and the typed
/// nodes that reference them, and stay alive with the typed tree.
#[derive(Debug, Clone)]
pub enum Entity {
    Variable(Variable),
    Parameter(Variable),
    Field(Variable),
    Function(Function),
    Class(Rc<ClassType>),
    /// A built-in type name such as `int`.
    Type(Type),
}

impl Entity {
    pub fn get_name(&self) -> &str {
        match self {
            Entity::Variable(variable) | Entity::Parameter(variable) | Entity::Field(variable) => {
                &variable.name
            }
            Entity::Function(function) => &function.name,
            Entity::Class(class) => &class.name,
            Entity::Type(Type::Scalar(scalar)) => scalar.description(),
            Entity::Type(_) => "<type>",
        }
    }

    /// Type of the entity when used as a value, `None` for type names.
    pub fn value_type(&self) -> Option<Type> {
        match self {
            Entity::Variable(variable) | Entity::Parameter(variable) | Entity::Field(variable) => {
                Some(variable.var_type.clone())
            }
            Entity::Function(function) => Some(Type::Function(function.signature())),
            Entity::Class(_) | Entity::Type(_) => None,
        }
    }

    /// The type this entity denotes when used in a type annotation.
    pub fn as_type(&self) -> Option<Type> {
        match self {
            Entity::Class(class) => Some(Type::Class(Rc::clone(class))),
            Entity::Type(ty) => Some(ty.clone()),
            _ => None,
        }
    }
}
