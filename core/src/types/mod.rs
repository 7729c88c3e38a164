//! Zero-sized stand-ins for PostgreSQL column types.
//!
//! Capability traits group the markers: [`Numeric`] types take arithmetic,
//! [`Textual`] types take `LIKE`, [`BooleanLike`] types can be conditions.
//! [`Compatible`] lists the pairs that may meet in a comparison, and
//! [`ArithmeticOutput`] picks the widened result type of `a + b`.

mod sealed {
    pub trait Sealed {}
}

#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a recognized SQL data type",
    label = "use a crampon SQL type marker (Int, Text, Bool, etc.)"
)]
pub trait DataType: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    /// Name as written in DDL.
    const NAME: &'static str;
}

#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a numeric SQL type",
    label = "arithmetic requires SmallInt, Int, BigInt, Float, or Double"
)]
pub trait Numeric: DataType {
    /// Type a `SUM` over this type is cast back to. The server widens
    /// `SUM(bigint)` to NUMERIC.
    const SUM_CAST: Option<&'static str> = None;
}

#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a text SQL type",
    label = "expected Text or VarChar"
)]
pub trait Textual: DataType {}

#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a boolean SQL type",
    label = "conditions must be boolean expressions"
)]
pub trait BooleanLike: DataType {}

macro_rules! markers {
    ($($name:ident = $sql:literal $(: $($cap:ident),+)?;)*) => {$(
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl DataType for $name {
            const NAME: &'static str = $sql;
        }

        $($(impl $cap for $name {})+)?
    )*};
}

markers! {
    SmallInt = "SMALLINT": Numeric;
    Int = "INTEGER": Numeric;
    BigInt = "BIGINT";
    Float = "REAL": Numeric;
    Double = "DOUBLE PRECISION": Numeric;
    Text = "TEXT": Textual;
    VarChar = "VARCHAR": Textual;
    Bool = "BOOLEAN": BooleanLike;
    Bytes = "BYTEA";
    Date = "DATE";
    Time = "TIME";
    Timestamp = "TIMESTAMP";
    TimestampTz = "TIMESTAMPTZ";
    Uuid = "UUID";
    Json = "JSON";
    Jsonb = "JSONB";
    // Untyped fragments. Satisfies every capability.
    Any = "ANY": Numeric, Textual, BooleanLike;
}

impl Numeric for BigInt {
    const SUM_CAST: Option<&'static str> = Some("BIGINT");
}

/// SQL types that may appear on both sides of a comparison.
#[diagnostic::on_unimplemented(
    message = "SQL type `{Self}` is not compatible with `{Rhs}`",
    label = "these SQL types cannot be compared or coerced",
    note = "numbers compare with numbers, text with text, and every type with itself"
)]
pub trait Compatible<Rhs: DataType = Self>: DataType {}

impl<T: DataType> Compatible<T> for T {}

/// Every distinct pair within a group is compatible both ways.
macro_rules! compatible_group {
    ($head:ident $(, $tail:ident)*) => {
        $(
            impl Compatible<$tail> for $head {}
            impl Compatible<$head> for $tail {}
        )*
        compatible_group!($($tail),*);
    };
    () => {};
}

compatible_group!(SmallInt, Int, BigInt, Float, Double);
compatible_group!(Text, VarChar, Uuid);
compatible_group!(Json, Jsonb);
compatible_group!(Timestamp, TimestampTz);

macro_rules! any_compatible {
    ($($ty:ident),*) => {$(
        impl Compatible<$ty> for Any {}
        impl Compatible<Any> for $ty {}
    )*};
}

any_compatible!(
    SmallInt, Int, BigInt, Float, Double, Text, VarChar, Bool, Bytes, Date, Time, Timestamp,
    TimestampTz, Uuid, Json, Jsonb
);

/// Result type of arithmetic between two numeric types.
pub trait ArithmeticOutput<Rhs: Numeric = Self>: Numeric {
    type Output: Numeric;
}

/// Numeric types ordered by width. A pair widens to the later of the two.
macro_rules! widening {
    (@pairs [$($done:ident)*]) => {};
    (@pairs [$($done:ident)*] $next:ident $($rest:ident)*) => {
        impl ArithmeticOutput<$next> for $next {
            type Output = $next;
        }
        $(
            impl ArithmeticOutput<$done> for $next {
                type Output = $next;
            }
            impl ArithmeticOutput<$next> for $done {
                type Output = $next;
            }
        )*
        widening!(@pairs [$($done)* $next] $($rest)*);
    };
    ($($ty:ident)<*) => {
        widening!(@pairs [] $($ty)*);
    };
}

widening!(SmallInt < Int < BigInt < Float < Double);
