//! Macros for declaring validated records.

/// Declare a struct together with its field metadata.
///
/// Each field may carry `#[check(key = "value", ...)]` attributes; their
/// entries become the field's metadata. Any other field attribute, doc
/// comments included, is kept on the generated field. The macro generates
/// the struct, an associated `declaration()` returning the shared record
/// declaration, and a [`Validatable`](crate::core::Validatable)
/// implementation.
///
/// # Example
///
/// ```
/// use fieldguard::engine::Validator;
/// use fieldguard::validated_record;
///
/// validated_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Order {
///         /// Number of items ordered.
///         #[check(valid = "PosNO", name = "items")]
///         pub item_num: i64,
///         #[check(valid = "PosNO")]
///         pub is_count: i64,
///     }
/// }
///
/// let mut order = Order { item_num: -1, is_count: 1 };
/// let err = Validator::standard().validate_data(&mut order).unwrap_err();
/// assert_eq!(err.to_string(), "items:cannot be negative!");
/// ```
#[macro_export]
macro_rules! validated_record {
    // Field munching: `[done fields] [pending attributes] [pending checks]`.
    (@fields $head:tt [$($done:tt)*] [] []) => {
        $crate::validated_record!(@emit $head [$($done)*]);
    };
    (@fields $head:tt [$($done:tt)*] [$($attrs:tt)*] [$($checks:tt)*]
        #[check($($key:ident = $value:literal),* $(,)?)]
        $($rest:tt)*
    ) => {
        $crate::validated_record!(@fields $head
            [$($done)*]
            [$($attrs)*]
            [$($checks)* $(($key $value))*]
            $($rest)*);
    };
    (@fields $head:tt [$($done:tt)*] [$($attrs:tt)*] [$($checks:tt)*]
        #[$attr:meta]
        $($rest:tt)*
    ) => {
        $crate::validated_record!(@fields $head
            [$($done)*]
            [$($attrs)* #[$attr]]
            [$($checks)*]
            $($rest)*);
    };
    (@fields $head:tt [$($done:tt)*] [$($attrs:tt)*] [$($checks:tt)*]
        $field_vis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::validated_record!(@fields $head
            [$($done)* { [$($attrs)*] [$($checks)*] [$field_vis] $field [$ty] }]
            []
            []
            $($($rest)*)?);
    };

    (@emit
        { [$(#[$meta:meta])*] [$vis:vis] $name:ident }
        [$({
            [$($field_attr:tt)*]
            [$(($key:ident $value:tt))*]
            [$field_vis:vis] $field:ident [$ty:ty]
        })*]
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $($field_attr)*
                $field_vis $field: $ty
            ),*
        }

        impl $name {
            /// Shared declaration of this record's fields.
            pub fn declaration() -> ::std::sync::Arc<$crate::core::RecordDecl> {
                static DECL: ::std::sync::OnceLock<::std::sync::Arc<$crate::core::RecordDecl>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(DECL.get_or_init(|| {
                    ::std::sync::Arc::new(
                        $crate::core::RecordDecl::new(stringify!($name))
                            $(
                                .field_with(
                                    stringify!($field),
                                    $crate::core::FieldMetadata::new()
                                        $(.with(stringify!($key), $value))*
                                )
                            )*
                    )
                }))
            }
        }

        impl $crate::core::Validatable for $name {
            fn to_node(&self) -> $crate::core::ValueNode {
                $crate::core::ValueNode::Record(
                    $crate::core::Record::new(Self::declaration())
                        $(
                            .set(
                                stringify!($field),
                                $crate::core::Validatable::to_node(&self.$field),
                            )
                        )*
                )
            }

            fn absorb(
                &mut self,
                node: $crate::core::ValueNode,
            ) -> ::std::result::Result<(), $crate::engine::ContractError> {
                #[allow(unused_mut)]
                let mut record = match node {
                    $crate::core::ValueNode::Record(record) => record,
                    other => {
                        return ::std::result::Result::Err(
                            $crate::engine::ContractError::ShapeMismatch {
                                expected: "record",
                                found: other.shape(),
                            },
                        )
                    }
                };
                $(
                    let value = record.take(stringify!($field)).ok_or_else(|| {
                        $crate::engine::ContractError::MissingStorage {
                            record: stringify!($name).to_string(),
                            field: stringify!($field).to_string(),
                        }
                    })?;
                    $crate::core::Validatable::absorb(&mut self.$field, value)?;
                )*
                ::std::result::Result::Ok(())
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::validated_record!(@fields { [$(#[$meta])*] [$vis] $name } [] [] [] $($body)*);
    };
}
