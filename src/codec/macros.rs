//! Declarative impls of [`NodeValue`](crate::codec::NodeValue).

/// Describe a struct's fields and their annotations.
///
/// ```
/// use kvtree::node_struct;
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     token: String,
///     labels: Vec<String>,
/// }
///
/// node_struct!(Server {
///     host = "hostname",
///     port,
///     token = "-",
///     labels = ",omitempty",
/// });
/// ```
///
/// Fields left out of the list are not mapped at all. The struct must
/// implement `Default`, which supplies the zero value when a missing node is
/// tolerated.
#[macro_export]
macro_rules! node_struct {
    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };
    ($ty:ty { $($field:ident $(= $tag:literal)?),* $(,)? }) => {
        impl $crate::codec::StructNode for $ty {
            fn fields(&self) -> &'static [$crate::codec::FieldSpec] {
                static FIELDS: ::std::sync::OnceLock<::std::vec::Vec<$crate::codec::FieldSpec>> =
                    ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::codec::FieldSpec::parse(
                                ::std::stringify!($field),
                                $crate::node_struct!(@tag $($tag)?),
                            )
                        ),*
                    ]
                })
            }

            fn field(&self, name: &str) -> ::std::option::Option<&dyn $crate::codec::NodeValue> {
                $(
                    if name == ::std::stringify!($field) {
                        return ::std::option::Option::Some(&self.$field);
                    }
                )*
                let _ = name;
                ::std::option::Option::None
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> ::std::option::Option<&mut dyn $crate::codec::NodeValue> {
                $(
                    if name == ::std::stringify!($field) {
                        return ::std::option::Option::Some(&mut self.$field);
                    }
                )*
                let _ = name;
                ::std::option::Option::None
            }
        }

        impl $crate::codec::NodeValue for $ty {
            fn as_node(&self) -> $crate::codec::NodeRef<'_> {
                $crate::codec::NodeRef::Struct(self)
            }

            fn as_node_mut(&mut self) -> $crate::codec::NodeMut<'_> {
                $crate::codec::NodeMut::Struct(self)
            }

            fn reset(&mut self) {
                *self = <$ty as ::std::default::Default>::default();
            }
        }
    };
}

/// Route a type through hand-written [`JsonCodec`](crate::codec::JsonCodec)
/// and/or [`TextCodec`](crate::codec::TextCodec) impls.
///
/// `custom_node!(Ty => json)`, `custom_node!(Ty => text)`, or
/// `custom_node!(Ty => json, text)`. The type must implement `Default`.
#[macro_export]
macro_rules! custom_node {
    (@accessors json) => {
        fn json(&self) -> ::std::option::Option<&dyn $crate::codec::JsonCodec> {
            ::std::option::Option::Some(self)
        }

        fn json_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::codec::JsonCodec> {
            ::std::option::Option::Some(self)
        }
    };
    (@accessors text) => {
        fn text(&self) -> ::std::option::Option<&dyn $crate::codec::TextCodec> {
            ::std::option::Option::Some(self)
        }

        fn text_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::codec::TextCodec> {
            ::std::option::Option::Some(self)
        }
    };
    ($ty:ty => $($capability:ident),+ $(,)?) => {
        impl $crate::codec::CustomCodec for $ty {
            $( $crate::custom_node!(@accessors $capability); )+
        }

        impl $crate::codec::NodeValue for $ty {
            fn as_node(&self) -> $crate::codec::NodeRef<'_> {
                $crate::codec::NodeRef::Custom(self)
            }

            fn as_node_mut(&mut self) -> $crate::codec::NodeMut<'_> {
                $crate::codec::NodeMut::Custom(self)
            }

            fn reset(&mut self) {
                *self = <$ty as ::std::default::Default>::default();
            }
        }
    };
}

/// Store a serde type as one JSON leaf.
#[macro_export]
macro_rules! json_node {
    ($ty:ty) => {
        impl $crate::codec::JsonCodec for $ty {
            fn marshal_json(
                &self,
            ) -> ::std::result::Result<::std::vec::Vec<u8>, $crate::error::BoxError> {
                ::std::result::Result::Ok($crate::__serde_json::to_vec(self)?)
            }

            fn unmarshal_json(
                &mut self,
                bytes: &[u8],
            ) -> ::std::result::Result<(), $crate::error::BoxError> {
                *self = $crate::__serde_json::from_slice(bytes)?;
                ::std::result::Result::Ok(())
            }
        }

        $crate::custom_node!($ty => json);
    };
}

/// Store a `Display + FromStr` type as one text leaf.
#[macro_export]
macro_rules! text_node {
    ($ty:ty) => {
        impl $crate::codec::TextCodec for $ty {
            fn marshal_text(
                &self,
            ) -> ::std::result::Result<::std::string::String, $crate::error::BoxError> {
                ::std::result::Result::Ok(::std::string::ToString::to_string(self))
            }

            fn unmarshal_text(
                &mut self,
                text: &str,
            ) -> ::std::result::Result<(), $crate::error::BoxError> {
                *self = <$ty as ::std::str::FromStr>::from_str(text)
                    .map_err(|e| -> $crate::error::BoxError { e.into() })?;
                ::std::result::Result::Ok(())
            }
        }

        $crate::custom_node!($ty => text);
    };
}
