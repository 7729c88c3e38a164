//! The `pg_model!` declarative macro and its helpers.

/// Declares a model struct together with its table metadata.
///
/// ```ignore
/// use crampon_postgres::prelude::*;
///
/// pg_model! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct User in "users" {
///         pub id: i32 => Int { primary_key, autoincrement },
///         pub name: String => Text,
///         pub email: Option<String> => Text,
///         pub settings: Settings => Jsonb { json },
///         pub login_count: i64 => BigInt { storage_key = "logins" },
///         pub session: Option<String> { exclude },
///     }
/// }
/// ```
///
/// - The table name defaults to the lowercased struct name.
/// - `=> Type` names the SQL type marker; without it the column is `Any`.
/// - Field flags: `primary_key`, `autoincrement`, `json`, `exclude` and
///   `storage_key = "column"`.
/// - The struct must derive `Debug` and `Clone`. Excluded fields must
///   implement `Default`; JSON fields must implement `Serialize` and
///   `DeserializeOwned`.
///
/// Besides the struct this generates a `<Name>Columns` struct of typed
/// [`Column`](crate::Column) handles, the [`Model`](crate::Model)
/// implementation and the typed-extraction impls.
#[macro_export]
macro_rules! pg_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(in $table:literal)? {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
                $(=> $sql:ty)?
                $({ $($flag:ident $(= $arg:literal)?),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        $crate::__private::paste::paste! {
            impl $name {
                #[doc(hidden)]
                pub const TABLE_NAME: &'static str = $crate::__crampon_table_name!($name $(, $table)?);

                $(
                    #[doc(hidden)]
                    pub const [<__FIELD_ $field:upper>]: $crate::FieldMeta = $crate::FieldMeta::new(
                        $name::TABLE_NAME,
                        stringify!($field),
                        $crate::__crampon_sql_name!($($sql)?),
                    ) $($(.$flag($($arg)?))*)?;
                )*
            }

            #[derive(Debug, Clone, Copy)]
            $vis struct [<$name Columns>] {
                $(
                    pub $field: $crate::__crampon_column_type!(
                        $name, $ty, [$($sql)?]; $($($flag)*)?
                    ),
                )*
            }

            impl $crate::Model for $name {
                const NAME: &'static str = stringify!($name);

                type Columns = [<$name Columns>];

                fn table() -> &'static $crate::TableMeta {
                    static TABLE: $crate::TableMeta = $crate::TableMeta::new(
                        $name::TABLE_NAME,
                        stringify!($name),
                        &[$($name::[<__FIELD_ $field:upper>]),*],
                    );
                    &TABLE
                }

                fn columns() -> Self::Columns {
                    [<$name Columns>] {
                        $(
                            $field: $crate::__crampon_column_value!(
                                &$name::[<__FIELD_ $field:upper>]; $($($flag)*)?
                            ),
                        )*
                    }
                }

                #[allow(unused_mut, unused_variables)]
                fn from_fields(
                    mut fields: $crate::FieldValues,
                ) -> ::core::result::Result<Self, $crate::FieldError> {
                    ::core::result::Result::Ok(Self {
                        $(
                            $field: $crate::__crampon_read_field!(fields, $field; $($($flag)*)?),
                        )*
                    })
                }

                fn to_values(
                    &self,
                ) -> $crate::Result<
                    ::std::vec::Vec<(&'static $crate::FieldMeta, $crate::PostgresValue)>,
                > {
                    let mut values = ::std::vec::Vec::with_capacity(
                        <Self as $crate::Model>::table().fields.len(),
                    );
                    $(
                        $crate::__crampon_write_field!(
                            values, self.$field, &$name::[<__FIELD_ $field:upper>]; $($($flag)*)?
                        );
                    )*
                    ::core::result::Result::Ok(values)
                }

                #[allow(unreachable_code)]
                fn primary_key_value(
                    &self,
                ) -> $crate::Result<::core::option::Option<$crate::PostgresValue>> {
                    $(
                        $crate::__crampon_if_primary_key!($($($flag)*)?; {
                            return $crate::ColumnValue::to_postgres_value(&self.$field)
                                .map(::core::option::Option::Some);
                        });
                    )*
                    ::core::result::Result::Ok(::core::option::Option::None)
                }

                #[allow(unreachable_code, unused_variables)]
                fn set_primary_key(&mut self, value: &$crate::PostgresValue) -> $crate::Result<()> {
                    $(
                        $crate::__crampon_if_primary_key!($($($flag)*)?; {
                            self.$field = $crate::FromPostgresValue::from_postgres_value(value)?;
                            return ::core::result::Result::Ok(());
                        });
                    )*
                    ::core::result::Result::Err($crate::CramponError::QueryError(
                        ::std::format!("model {} has no primary key", stringify!($name)).into(),
                    ))
                }
            }
        }

        impl $crate::cast::FromCastValue for $name {
            fn from_cast_value(value: $crate::cast::CastValue) -> $crate::Result<Self> {
                value.into_model::<Self>()
            }
        }

        impl $crate::cast::FromCastRow for $name {
            fn from_cast_row(row: $crate::cast::CastRow) -> $crate::Result<Self> {
                row.into_single()
                    .and_then(<Self as $crate::cast::FromCastValue>::from_cast_value)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_table_name {
    ($name:ident) => {
        $crate::__private::const_format::map_ascii_case!(
            $crate::__private::const_format::Case::Lower,
            stringify!($name)
        )
    };
    ($name:ident, $table:literal) => {
        $table
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_sql_name {
    () => {
        <$crate::types::Any as $crate::types::DataType>::NAME
    };
    ($sql:ty) => {
        <$sql as $crate::types::DataType>::NAME
    };
}

/// Column handle type for a field: `()` when excluded, `Json<T>` values for
/// JSON fields.
#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_column_type {
    (@flags $model:ident, $ty:ty, $sql:ty;) => {
        $crate::Column<$model, $sql, $ty>
    };
    (@flags $model:ident, $ty:ty, $sql:ty; exclude $($rest:ident)*) => {
        ()
    };
    (@flags $model:ident, $ty:ty, $sql:ty; json $($rest:ident)*) => {
        $crate::__crampon_column_type!(@json $model, $ty, $sql; $($rest)*)
    };
    (@flags $model:ident, $ty:ty, $sql:ty; $other:ident $($rest:ident)*) => {
        $crate::__crampon_column_type!(@flags $model, $ty, $sql; $($rest)*)
    };
    (@json $model:ident, $ty:ty, $sql:ty;) => {
        $crate::Column<$model, $sql, $crate::Json<$ty>>
    };
    (@json $model:ident, $ty:ty, $sql:ty; exclude $($rest:ident)*) => {
        ()
    };
    (@json $model:ident, $ty:ty, $sql:ty; $other:ident $($rest:ident)*) => {
        $crate::__crampon_column_type!(@json $model, $ty, $sql; $($rest)*)
    };
    ($model:ident, $ty:ty, []; $($flag:ident)*) => {
        $crate::__crampon_column_type!(@flags $model, $ty, $crate::types::Any; $($flag)*)
    };
    ($model:ident, $ty:ty, [$sql:ty]; $($flag:ident)*) => {
        $crate::__crampon_column_type!(@flags $model, $ty, $sql; $($flag)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_column_value {
    ($meta:expr;) => {
        $crate::Column::new($meta)
    };
    ($meta:expr; exclude $($rest:ident)*) => {
        ()
    };
    ($meta:expr; $other:ident $($rest:ident)*) => {
        $crate::__crampon_column_value!($meta; $($rest)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_read_field {
    (@json $fields:ident, $field:ident;) => {
        $fields.take_json(stringify!($field))?
    };
    (@json $fields:ident, $field:ident; exclude $($rest:ident)*) => {
        ::core::default::Default::default()
    };
    (@json $fields:ident, $field:ident; $other:ident $($rest:ident)*) => {
        $crate::__crampon_read_field!(@json $fields, $field; $($rest)*)
    };
    ($fields:ident, $field:ident;) => {
        $fields.take(stringify!($field))?
    };
    ($fields:ident, $field:ident; exclude $($rest:ident)*) => {
        ::core::default::Default::default()
    };
    ($fields:ident, $field:ident; json $($rest:ident)*) => {
        $crate::__crampon_read_field!(@json $fields, $field; $($rest)*)
    };
    ($fields:ident, $field:ident; $other:ident $($rest:ident)*) => {
        $crate::__crampon_read_field!($fields, $field; $($rest)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_write_field {
    (@json $out:ident, $value:expr, $meta:expr;) => {
        $out.push(($meta, $crate::model::json_field_value($meta, &$value)?))
    };
    (@json $out:ident, $value:expr, $meta:expr; exclude $($rest:ident)*) => {};
    (@json $out:ident, $value:expr, $meta:expr; $other:ident $($rest:ident)*) => {
        $crate::__crampon_write_field!(@json $out, $value, $meta; $($rest)*)
    };
    ($out:ident, $value:expr, $meta:expr;) => {
        $out.push(($meta, $crate::ColumnValue::to_postgres_value(&$value)?))
    };
    ($out:ident, $value:expr, $meta:expr; exclude $($rest:ident)*) => {};
    ($out:ident, $value:expr, $meta:expr; json $($rest:ident)*) => {
        $crate::__crampon_write_field!(@json $out, $value, $meta; $($rest)*)
    };
    ($out:ident, $value:expr, $meta:expr; $other:ident $($rest:ident)*) => {
        $crate::__crampon_write_field!($out, $value, $meta; $($rest)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __crampon_if_primary_key {
    (; $body:block) => {};
    (primary_key $($rest:ident)*; $body:block) => {
        $body
    };
    ($other:ident $($rest:ident)*; $body:block) => {
        $crate::__crampon_if_primary_key!($($rest)*; $body)
    };
}
