//! `Configurable` implementations for standard library types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::PathBuf;

use crate::codec::{self, DecodeContext, EncodeContext};
use crate::error::ConfigError;
use crate::node::Node;
use crate::value::{RawMap, RawValue};

use super::{ConfigStruct, Configurable, ScalarKind, TypeDescriptor};

macro_rules! impl_scalar {
    ($kind:expr, $native:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Configurable for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Scalar($kind)
                }

                fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
                    if let Some(value) = codec::decode_from_str::<$ty>(node, cx)? {
                        *self = value;
                    }
                    Ok(())
                }

                fn encode(&self, name: &str, _cx: &EncodeContext) -> Option<Node> {
                    let node = Node::leaf(name, self.to_string());
                    let native: fn(&$ty) -> Option<RawValue> = $native;
                    Some(match native(self) {
                        Some(value) => node.with_native(value),
                        None => node,
                    })
                }

                #[allow(clippy::float_cmp)]
                fn is_zero(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )+
    };
}

impl_scalar!(ScalarKind::Int, |v| i64::try_from(*v).ok().map(RawValue::Int) => i8, i16, i32, i64, i128, isize);
impl_scalar!(ScalarKind::Uint, |v| i64::try_from(*v).ok().map(RawValue::Int) => u8, u16, u32, u64, u128, usize);
impl_scalar!(ScalarKind::Float, |v| Some(RawValue::Float(f64::from(*v))) => f32, f64);
impl_scalar!(ScalarKind::Char, |v| Some(RawValue::String(v.to_string())) => char);
impl_scalar!(ScalarKind::String, |v| Some(RawValue::String(v.clone())) => String);

impl Configurable for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Bool)
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        if let Some(value) = codec::decode_bool(node, cx)? {
            *self = value;
        }
        Ok(())
    }

    fn encode(&self, name: &str, _cx: &EncodeContext) -> Option<Node> {
        Some(Node::leaf(name, self.to_string()).with_native(RawValue::Bool(*self)))
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Configurable for PathBuf {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Path)
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        if let Some(value) = codec::decode_from_str::<Self>(node, cx)? {
            *self = value;
        }
        Ok(())
    }

    fn encode(&self, name: &str, _cx: &EncodeContext) -> Option<Node> {
        Some(Node::leaf(name, self.display().to_string()))
    }

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl<T: Configurable + Default> Configurable for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Pointer(Box::new(T::descriptor()))
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        codec::decode_pointer(self, node, cx)
    }

    fn encode(&self, name: &str, cx: &EncodeContext) -> Option<Node> {
        codec::encode_pointer(self.as_ref(), name, cx)
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: Configurable> Configurable for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        (**self).decode(node, cx)
    }

    fn encode(&self, name: &str, cx: &EncodeContext) -> Option<Node> {
        (**self).encode(name, cx)
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn as_struct(&self) -> Option<&dyn ConfigStruct> {
        (**self).as_struct()
    }

    fn as_struct_mut(&mut self) -> Option<&mut dyn ConfigStruct> {
        (**self).as_struct_mut()
    }
}

impl<T: Configurable + Default> Configurable for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Slice(Box::new(T::descriptor()))
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        codec::decode_slice(self, node, cx)
    }

    fn encode(&self, name: &str, cx: &EncodeContext) -> Option<Node> {
        Some(codec::encode_items(name, self.iter(), cx))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<V: Configurable + Default, H: BuildHasher + Default> Configurable for HashMap<String, V, H> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Map(Box::new(V::descriptor()))
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        codec::decode_map(node, cx, |key, child, cx| {
            self.entry(key).or_default().decode(child, cx)
        })
    }

    fn encode(&self, name: &str, cx: &EncodeContext) -> Option<Node> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Some(codec::encode_entries(name, entries, cx))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<V: Configurable + Default> Configurable for BTreeMap<String, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Map(Box::new(V::descriptor()))
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        codec::decode_map(node, cx, |key, child, cx| {
            self.entry(key).or_default().decode(child, cx)
        })
    }

    fn encode(&self, name: &str, cx: &EncodeContext) -> Option<Node> {
        Some(codec::encode_entries(name, self.iter(), cx))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Configurable for RawValue {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Raw
    }

    fn decode(&mut self, node: &Node, _cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        if !node.is_empty() {
            *self = codec::raw_from_node(node);
        }
        Ok(())
    }

    fn encode(&self, name: &str, _cx: &EncodeContext) -> Option<Node> {
        Some(crate::node::from_value(name, self))
    }

    fn is_zero(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Mapping(map) => map.is_empty(),
            Self::Int(_) | Self::Float(_) | Self::Bool(_) => false,
        }
    }
}

impl Configurable for RawMap {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Raw
    }

    fn decode(&mut self, node: &Node, cx: &mut DecodeContext<'_>) -> Result<(), ConfigError> {
        codec::decode_raw_map(self, node, cx)
    }

    fn encode(&self, name: &str, _cx: &EncodeContext) -> Option<Node> {
        Some(crate::node::from_value(name, &RawValue::Mapping(self.clone())))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}
