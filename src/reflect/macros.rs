//! Declarative implementations of the reflection traits.

/// Implements [`Configurable`](crate::reflect::Configurable) and
/// [`ConfigStruct`](crate::reflect::ConfigStruct) for a struct.
///
/// List the fields that take part in configuration, each optionally
/// followed by a help description and preceded by options:
/// `#[flatten]`, `#[rename("name")]`, `#[required]`.
///
/// Every field type must implement `Configurable`; `Option` fields also
/// need `Default` on their inner type (it is used when the section is
/// allocated).
///
/// # Example
///
/// ```
/// use cfgtree::configurable;
///
/// #[derive(Debug, Default)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// configurable!(Server {
///     host: "Address to bind",
///     #[required]
///     port: "Port to listen on",
/// });
/// ```
#[macro_export]
macro_rules! configurable {
    ($ty:ident {
        $(
            $(#[$option:ident $(($($arg:expr),* $(,)?))?])*
            $field:ident $(: $description:literal)?
        ),* $(,)?
    }) => {
        impl $crate::reflect::ConfigStruct for $ty {
            fn struct_descriptor(&self) -> $crate::reflect::StructDescriptor {
                match <Self as $crate::reflect::Configurable>::descriptor() {
                    $crate::reflect::TypeDescriptor::Struct(descriptor) => descriptor,
                    _ => unreachable!("configurable! always describes a struct"),
                }
            }

            fn field(&self, key: &str) -> Option<&dyn $crate::reflect::Configurable> {
                $(
                    if key == stringify!($field) {
                        return Some(&self.$field);
                    }
                )*
                let _ = key;
                None
            }

            fn field_mut(&mut self, key: &str) -> Option<&mut dyn $crate::reflect::Configurable> {
                $(
                    if key == stringify!($field) {
                        return Some(&mut self.$field);
                    }
                )*
                let _ = key;
                None
            }
        }

        impl $crate::reflect::Configurable for $ty {
            fn descriptor() -> $crate::reflect::TypeDescriptor {
                $crate::reflect::TypeDescriptor::Struct($crate::reflect::StructDescriptor::new(
                    stringify!($ty),
                    vec![
                        $(
                            $crate::reflect::FieldDescriptor::of(
                                stringify!($field),
                                |value: &$ty| &value.$field,
                            )
                            $(.describe($description))?
                            $(.$option($($($arg),*)?))*
                        ),*
                    ],
                ))
            }

            fn decode(
                &mut self,
                node: &$crate::node::Node,
                cx: &mut $crate::codec::DecodeContext<'_>,
            ) -> Result<(), $crate::ConfigError> {
                $crate::codec::decode_struct(self, node, cx)
            }

            fn encode(
                &self,
                name: &str,
                cx: &$crate::codec::EncodeContext,
            ) -> Option<$crate::node::Node> {
                Some($crate::codec::encode_struct(self, name, cx))
            }

            fn is_zero(&self) -> bool {
                true $(&& $crate::reflect::Configurable::is_zero(&self.$field))*
            }

            fn as_struct(&self) -> Option<&dyn $crate::reflect::ConfigStruct> {
                Some(self)
            }

            fn as_struct_mut(&mut self) -> Option<&mut dyn $crate::reflect::ConfigStruct> {
                Some(self)
            }
        }
    };
}

/// Implements [`Configurable`](crate::reflect::Configurable) for a type
/// that implements [`ScalarCodec`](crate::reflect::ScalarCodec),
/// `Default` and `PartialEq`.
///
/// The type becomes a leaf: its nodes are parsed and formatted by the
/// codec, never recursed into.
#[macro_export]
macro_rules! custom_scalar {
    ($ty:ty) => {
        impl $crate::reflect::Configurable for $ty {
            fn descriptor() -> $crate::reflect::TypeDescriptor {
                $crate::reflect::TypeDescriptor::CustomCodec(
                    <$ty as $crate::reflect::ScalarCodec>::NAME,
                )
            }

            fn decode(
                &mut self,
                node: &$crate::node::Node,
                cx: &mut $crate::codec::DecodeContext<'_>,
            ) -> Result<(), $crate::ConfigError> {
                if let Some(value) = $crate::codec::decode_custom::<$ty>(node, cx)? {
                    *self = value;
                }
                Ok(())
            }

            fn encode(
                &self,
                name: &str,
                _cx: &$crate::codec::EncodeContext,
            ) -> Option<$crate::node::Node> {
                Some($crate::node::Node::leaf(
                    name,
                    $crate::reflect::ScalarCodec::format_to_string(self),
                ))
            }

            fn is_zero(&self) -> bool {
                *self == <$ty as Default>::default()
            }
        }
    };
}
