//! Semantic types.
//!
//! Scalars are a fixed `Copy` enumeration, so every `int` is the same value
//! and compares by identity. Composite types (arrays, maps, functions) are
//! structural. Class types are nominal: a `ClassType` is shared through an
//! `Rc` and two class types are equivalent only if they are the same
//! allocation.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{Debug, Display},
    rc::Rc,
};

use lazy_static::lazy_static;

lazy_static! {
    /// Surface names of the built-in types, registered in every root scope.
    pub static ref BUILT_IN_TYPES: HashMap<&'static str, Scalar> = {
        let mut map = HashMap::new();
        map.insert("int", Scalar::Int);
        map.insert("doubloon", Scalar::Double);
        map.insert("booty", Scalar::Boolean);
        map.insert("shanty", Scalar::String);
        map.insert("none", Scalar::None);
        map
    };
}

/// Looks up a built-in type by its surface name.
pub fn built_in_type(name: &str) -> Option<Type> {
    BUILT_IN_TYPES.get(name).map(|scalar| Type::Scalar(*scalar))
}

pub fn built_in_type_names() -> impl Iterator<Item = &'static str> {
    BUILT_IN_TYPES.keys().copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int,
    Double,
    Boolean,
    String,
    None,
    /// Element type of an empty array or map literal, pending inference.
    Any,
}

impl Scalar {
    pub fn description(&self) -> &'static str {
        match self {
            Scalar::Int => "int",
            Scalar::Double => "doubloon",
            Scalar::Boolean => "booty",
            Scalar::String => "shanty",
            Scalar::None => "none",
            Scalar::Any => "any",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionType {
    pub parameters: Vec<Type>,
    pub return_type: Box<Type>,
}

impl FunctionType {
    pub fn new(parameters: Vec<Type>, return_type: Type) -> Self {
        FunctionType {
            parameters,
            return_type: Box::new(return_type),
        }
    }

    pub fn equivalent(&self, other: &FunctionType) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters.iter())
                .all(|(mine, theirs)| mine.equivalent(theirs))
            && self.return_type.equivalent(&other.return_type)
    }
}

/// A named member of a class: a field or a method.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub member_type: Type,
}

/// The type created by one class declaration.
///
/// Members are filled in while the class body is checked, so they sit
/// behind `RefCell`s: `self` inside the constructor and methods already
/// refers to this value.
pub struct ClassType {
    pub name: String,
    constructor: RefCell<FunctionType>,
    fields: RefCell<Vec<Member>>,
    methods: RefCell<Vec<Member>>,
}

impl ClassType {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(ClassType {
            name: name.to_string(),
            constructor: RefCell::new(FunctionType::new(vec![], Type::Scalar(Scalar::None))),
            fields: RefCell::new(vec![]),
            methods: RefCell::new(vec![]),
        })
    }

    pub fn constructor(&self) -> FunctionType {
        self.constructor.borrow().clone()
    }

    pub fn set_constructor(&self, signature: FunctionType) {
        *self.constructor.borrow_mut() = signature;
    }

    pub fn get_field(&self, name: &str) -> Option<Type> {
        self.fields
            .borrow()
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.member_type.clone())
    }

    pub fn get_method(&self, name: &str) -> Option<FunctionType> {
        self.methods
            .borrow()
            .iter()
            .find(|method| method.name == name)
            .and_then(|method| match &method.member_type {
                Type::Function(signature) => Some(signature.clone()),
                _ => None,
            })
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.borrow().iter().map(|f| f.name.clone()).collect()
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.borrow().iter().map(|m| m.name.clone()).collect()
    }

    /// Returns `false` if a field with this name already exists.
    pub fn add_field(&self, name: &str, field_type: Type) -> bool {
        if self.get_field(name).is_some() {
            return false;
        }
        self.fields.borrow_mut().push(Member {
            name: name.to_string(),
            member_type: field_type,
        });
        true
    }

    /// Returns `false` if a method with this name already exists.
    pub fn add_method(&self, name: &str, signature: FunctionType) -> bool {
        if self.get_method(name).is_some() {
            return false;
        }
        self.methods.borrow_mut().push(Member {
            name: name.to_string(),
            member_type: Type::Function(signature),
        });
        true
    }
}

// Members may mention the class itself, so only the name is printed.
impl Debug for ClassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassType")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .field("methods", &self.method_names())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Type {
    Scalar(Scalar),
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Function(FunctionType),
    Class(Rc<ClassType>),
}

impl Type {
    pub const INT: Type = Type::Scalar(Scalar::Int);
    pub const DOUBLE: Type = Type::Scalar(Scalar::Double);
    pub const BOOLEAN: Type = Type::Scalar(Scalar::Boolean);
    pub const STRING: Type = Type::Scalar(Scalar::String);
    pub const NONE: Type = Type::Scalar(Scalar::None);
    pub const ANY: Type = Type::Scalar(Scalar::Any);

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn function(parameters: Vec<Type>, return_type: Type) -> Self {
        Type::Function(FunctionType::new(parameters, return_type))
    }

    /// Whether `self` and `other` denote the same type. `any` on the left
    /// matches everything; the reverse does not hold.
    pub fn equivalent(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Scalar(Scalar::Any), _) => true,
            (Type::Scalar(mine), Type::Scalar(theirs)) => mine == theirs,
            (Type::Array(mine), Type::Array(theirs)) => mine.equivalent(theirs),
            (Type::Map(my_key, my_value), Type::Map(their_key, their_value)) => {
                my_key.equivalent(their_key) && my_value.equivalent(their_value)
            }
            (Type::Function(mine), Type::Function(theirs)) => mine.equivalent(theirs),
            (Type::Class(mine), Type::Class(theirs)) => Rc::ptr_eq(mine, theirs),
            _ => false,
        }
    }

    /// Whether a value of type `self` can be stored in a location of type
    /// `target`. Arrays and maps are invariant, and function types have no
    /// variance, so apart from an `any` target this is equivalence.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        target.is_any() || self.equivalent(target)
    }

    /// The type two sibling values share, such as the elements of one array
    /// literal or the arms of a conditional. `any` fills in from either side,
    /// so `[any]` and `[int]` share `[int]` in both orders.
    pub fn common_type(&self, other: &Type) -> Option<Type> {
        match (self, other) {
            (Type::Scalar(Scalar::Any), _) => Some(other.clone()),
            (_, Type::Scalar(Scalar::Any)) => Some(self.clone()),
            (Type::Scalar(mine), Type::Scalar(theirs)) if mine == theirs => Some(self.clone()),
            (Type::Array(mine), Type::Array(theirs)) => Some(Type::array(mine.common_type(theirs)?)),
            (Type::Map(my_key, my_value), Type::Map(their_key, their_value)) => Some(Type::map(
                my_key.common_type(their_key)?,
                my_value.common_type(their_value)?,
            )),
            (Type::Function(mine), Type::Function(theirs))
                if mine.equivalent(theirs) && theirs.equivalent(mine) =>
            {
                Some(self.clone())
            }
            (Type::Class(mine), Type::Class(theirs)) if Rc::ptr_eq(mine, theirs) => {
                Some(self.clone())
            }
            _ => None,
        }
    }

    /// Whether `any` occurs anywhere inside this type, e.g. `[[any]]`.
    pub fn contains_any(&self) -> bool {
        match self {
            Type::Scalar(scalar) => *scalar == Scalar::Any,
            Type::Array(element) => element.contains_any(),
            Type::Map(key, value) => key.contains_any() || value.contains_any(),
            Type::Function(_) | Type::Class(_) => false,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Scalar(Scalar::Any))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Type::Scalar(Scalar::None))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Scalar(Scalar::Int))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Scalar(Scalar::Int) | Type::Scalar(Scalar::Double))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Scalar(Scalar::Boolean))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Scalar(Scalar::String))
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Scalar(scalar) => write!(f, "{}", scalar.description()),
            Type::Array(element) => write!(f, "[{}]", element),
            Type::Map(key, value) => write!(f, "{{{} : {}}}", key, value),
            Type::Function(signature) => {
                let parameters = signature
                    .parameters
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<String>>()
                    .join(",");
                write!(f, "({})->{}", parameters, signature.return_type)
            }
            Type::Class(class) => write!(f, "{}", class.name),
        }
    }
}
