//! Type reflection for configuration targets.
//!
//! This module provides:
//! - Shape descriptions of target types ([`TypeDescriptor`], [`StructDescriptor`], [`FieldDescriptor`])
//! - The trait every decodable/encodable type implements ([`Configurable`])
//! - Field access for struct targets ([`ConfigStruct`], generated by [`configurable!`](crate::configurable))
//! - The capability trait for types owning their text form ([`ScalarCodec`])
//! - Path resolution against a descriptor ([`resolve_path`]), used by the env and flag adapters
//!
//! # Field matching
//!
//! Node names match field names case-insensitively; an exact-case match is
//! preferred. Fields marked `#[flatten]` promote their own fields into the
//! parent namespace unless they were also renamed.

mod impls;
mod macros;
mod resolve;

#[cfg(test)]
mod reflect_tests;

pub use resolve::{FieldRoute, ResolvedPath, SegmentMode, resolve_path};

use crate::codec::{DecodeContext, EncodeContext};
use crate::error::ConfigError;
use crate::node::Node;

/// Primitive scalar categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `bool`
    Bool,
    /// Signed integers
    Int,
    /// Unsigned integers
    Uint,
    /// Floating point numbers
    Float,
    /// `char`
    Char,
    /// `String`
    String,
    /// `PathBuf`
    Path,
}

/// Runtime description of a target type's shape.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// A primitive parsed from text.
    Scalar(ScalarKind),
    /// A struct with named fields.
    Struct(StructDescriptor),
    /// A growable list of elements.
    Slice(Box<TypeDescriptor>),
    /// A string-keyed map; the box holds the value descriptor.
    Map(Box<TypeDescriptor>),
    /// An optional value allocated only when its node is non-empty.
    Pointer(Box<TypeDescriptor>),
    /// A leaf converted by its own [`ScalarCodec`]; holds the codec name.
    CustomCodec(&'static str),
    /// An untyped pass-through section.
    Raw,
}

impl TypeDescriptor {
    /// Short name of the shape, used in error messages and help output.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Struct(_) => "struct",
            Self::Slice(_) => "list",
            Self::Map(_) => "map",
            Self::Pointer(_) => "optional",
            Self::CustomCodec(name) => *name,
            Self::Raw => "raw",
        }
    }

    /// Returns `true` for shapes that are written as a single text value.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Scalar(_) | Self::CustomCodec(_) => true,
            Self::Pointer(inner) => inner.is_leaf(),
            _ => false,
        }
    }

    /// Returns `true` if a bare flag (`--name`) sets this target.
    ///
    /// Booleans read it as `true`; optional sections read it as "enable
    /// with defaults".
    #[must_use]
    pub fn accepts_bare_flag(&self) -> bool {
        match self {
            Self::Scalar(ScalarKind::Bool) => true,
            Self::Pointer(inner) => {
                matches!(**inner, Self::Struct(_)) || inner.accepts_bare_flag()
            }
            _ => false,
        }
    }

    /// Strips `Pointer` layers.
    #[must_use]
    pub fn pointee(&self) -> &Self {
        match self {
            Self::Pointer(inner) => inner.pointee(),
            other => other,
        }
    }
}

/// Shape of a struct target.
#[derive(Debug, Clone)]
pub struct StructDescriptor {
    /// Rust type name
    pub type_name: &'static str,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    /// Creates a struct descriptor.
    #[must_use]
    pub const fn new(type_name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { type_name, fields }
    }

    /// Fields as seen from configuration sources: promoted fields of
    /// flattened members replace the member itself.
    #[must_use]
    pub fn visible_fields(&self) -> Vec<FieldDescriptor> {
        let mut out = Vec::new();
        for field in &self.fields {
            if field.is_promoted() {
                if let TypeDescriptor::Struct(inner) = field.descriptor() {
                    out.extend(inner.visible_fields());
                    continue;
                }
            }
            out.push(field.clone());
        }
        out
    }
}

/// One field of a struct target.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Rust field identifier
    pub key: &'static str,
    /// Name matched against node names
    pub name: &'static str,
    /// One-line description shown in help output
    pub description: &'static str,
    /// A decoded struct node must provide this field
    pub required: bool,
    flatten: bool,
    renamed: bool,
    descriptor: fn() -> TypeDescriptor,
}

impl FieldDescriptor {
    /// Describes the field read by `accessor`.
    ///
    /// The accessor is only used to infer the field type.
    #[must_use]
    pub fn of<S, T, F>(key: &'static str, _accessor: F) -> Self
    where
        T: Configurable,
        F: for<'a> Fn(&'a S) -> &'a T,
    {
        Self {
            key,
            name: key,
            description: "",
            required: false,
            flatten: false,
            renamed: false,
            descriptor: T::descriptor,
        }
    }

    /// Sets the help description.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the configuration name.
    #[must_use]
    pub const fn rename(mut self, name: &'static str) -> Self {
        self.name = name;
        self.renamed = true;
        self
    }

    /// Promotes the fields of this struct-typed member into the parent.
    #[must_use]
    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns `true` if the member's fields are promoted into the parent.
    #[must_use]
    pub const fn is_promoted(&self) -> bool {
        self.flatten && !self.renamed
    }

    /// Derives the field type's descriptor.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.descriptor)()
    }
}

/// A type that can be decoded from and encoded to a node tree.
///
/// Implemented for primitives, `String`, `PathBuf`, `Option`, `Box`, `Vec`,
/// string-keyed `HashMap`/`BTreeMap`, raw values, types declared with
/// [`custom_scalar!`](crate::custom_scalar) and structs declared with
/// [`configurable!`](crate::configurable).
pub trait Configurable {
    /// Describes the shape of the type.
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;

    /// Decodes `node` into `self`, leaving parts without nodes untouched.
    ///
    /// # Errors
    ///
    /// Returns a path-annotated error on the first shape or parse failure.
    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError>;

    /// Encodes `self` as a node named `name`; `None` means absent.
    fn encode(&self, name: &str, cx: &EncodeContext) -> Option<Node>;

    /// Returns `true` if the value equals its zero/absent state.
    fn is_zero(&self) -> bool;

    /// Field access when the type is a struct.
    fn as_struct(&self) -> Option<&dyn ConfigStruct> {
        None
    }

    /// Mutable field access when the type is a struct.
    fn as_struct_mut(&mut self) -> Option<&mut dyn ConfigStruct> {
        None
    }
}

/// Field storage access for struct targets.
///
/// Fields are addressed by their Rust identifier ([`FieldDescriptor::key`]).
pub trait ConfigStruct {
    /// Describes the struct.
    fn struct_descriptor(&self) -> StructDescriptor;

    /// Borrows a field.
    fn field(&self, key: &str) -> Option<&dyn Configurable>;

    /// Mutably borrows a field.
    fn field_mut(&mut self, key: &str) -> Option<&mut dyn Configurable>;
}

/// Text conversion owned by the type itself.
///
/// Fields of such types are always leaves, whatever their internal
/// structure. Declare the [`Configurable`] impl with
/// [`custom_scalar!`](crate::custom_scalar).
pub trait ScalarCodec: Sized {
    /// Name shown in help output and errors.
    const NAME: &'static str;

    /// Parses the text form.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the text is malformed.
    fn parse_from_str(text: &str) -> Result<Self, String>;

    /// Formats the value so that `parse_from_str` gives it back.
    fn format_to_string(&self) -> String;
}
