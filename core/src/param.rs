use std::borrow::Cow;

use crate::traits::SQLParam;

/// A value bound to a statement. Its `$n` is assigned during rendering.
#[derive(Debug, Clone)]
pub struct Param<'a, V: SQLParam> {
    pub value: Cow<'a, V>,
}

impl<'a, V: SQLParam> Param<'a, V> {
    #[inline]
    pub const fn owned(value: V) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }

    #[inline]
    pub const fn borrowed(value: &'a V) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}
