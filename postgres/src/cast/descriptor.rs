use compact_str::{CompactString, format_compact};
use crampon_core::{CramponError, FieldMeta, Result, SelectionKind};

use crate::model::ModelRef;

/// Row key of the column selected at `position`.
///
/// Keys depend only on select positions: they are unique within a query and
/// far below the server's 63-byte identifier limit.
pub fn column_key(position: usize) -> CompactString {
    format_compact!("c{position}")
}

/// Row key of the `field`-th stored field of the model selected at
/// `position`.
pub fn field_key(position: usize, field: usize) -> CompactString {
    format_compact!("c{position}_{field}")
}

/// What the query builder put at one select position.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectRaw {
    /// Every stored field of a model
    Table(ModelRef),
    /// One model field
    Column(&'static FieldMeta),
    /// A function call such as `COUNT(...)`
    Function(FunctionMetadata),
}

/// Select-list facts about a function entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMetadata {
    /// Local alias assigned by the select builder, e.g. `aggregate_0`
    pub alias: Option<CompactString>,
}

/// Kind flags reported alongside each [`SelectRaw`]. Exactly one must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectFlags {
    pub is_table: bool,
    pub is_column: bool,
    pub is_function: bool,
}

impl SelectFlags {
    pub const TABLE: Self = Self {
        is_table: true,
        is_column: false,
        is_function: false,
    };

    pub const COLUMN: Self = Self {
        is_table: false,
        is_column: true,
        is_function: false,
    };

    pub const FUNCTION: Self = Self {
        is_table: false,
        is_column: false,
        is_function: true,
    };

    fn kind(self) -> std::result::Result<SelectionKind, &'static str> {
        match (self.is_table, self.is_column, self.is_function) {
            (true, false, false) => Ok(SelectionKind::WholeModel),
            (false, true, false) => Ok(SelectionKind::SingleColumn),
            (false, false, true) => Ok(SelectionKind::FunctionResult),
            (false, false, false) => Err("unrecognized selection kind: no flag set"),
            _ => Err("ambiguous selection kind: more than one flag set"),
        }
    }
}

/// One stored field of a whole-model selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub meta: &'static FieldMeta,
    /// Key the field is read from in a raw row
    pub key: CompactString,
}

/// Precomputed recipe for rebuilding one select position from a raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionDescriptor {
    WholeModel {
        model: ModelRef,
        /// Non-excluded fields in declaration order
        fields: Box<[FieldSlot]>,
    },
    SingleColumn {
        key: CompactString,
    },
    FunctionResult {
        alias: CompactString,
    },
}

impl SelectionDescriptor {
    pub const fn kind(&self) -> SelectionKind {
        match self {
            SelectionDescriptor::WholeModel { .. } => SelectionKind::WholeModel,
            SelectionDescriptor::SingleColumn { .. } => SelectionKind::SingleColumn,
            SelectionDescriptor::FunctionResult { .. } => SelectionKind::FunctionResult,
        }
    }

    fn whole_model(model: ModelRef, position: usize) -> Self {
        let fields = model
            .table()
            .stored_fields()
            .enumerate()
            .map(|(index, meta)| FieldSlot {
                meta,
                key: field_key(position, index),
            })
            .collect();
        SelectionDescriptor::WholeModel { model, fields }
    }
}

/// Derives one descriptor per select position.
///
/// Runs once per query shape. Every inconsistency between `raws` and
/// `flags` is reported here, before any row is read.
pub fn classify(raws: &[SelectRaw], flags: &[SelectFlags]) -> Result<Vec<SelectionDescriptor>> {
    if raws.len() != flags.len() {
        return Err(CramponError::Classification {
            position: raws.len().min(flags.len()),
            reason: format!(
                "{} select entries but {} kind flags",
                raws.len(),
                flags.len()
            )
            .into(),
        });
    }

    raws.iter()
        .zip(flags)
        .enumerate()
        .map(|(position, (raw, flags))| {
            let kind = flags
                .kind()
                .map_err(|reason| CramponError::Classification {
                    position,
                    reason: reason.into(),
                })?;

            match (kind, raw) {
                (SelectionKind::WholeModel, SelectRaw::Table(model)) => {
                    Ok(SelectionDescriptor::whole_model(*model, position))
                }
                (SelectionKind::SingleColumn, SelectRaw::Column(_)) => {
                    Ok(SelectionDescriptor::SingleColumn {
                        key: column_key(position),
                    })
                }
                (SelectionKind::FunctionResult, SelectRaw::Function(function)) => {
                    let alias = function.alias.clone().ok_or_else(|| {
                        CramponError::Classification {
                            position,
                            reason: "function result has no local alias".into(),
                        }
                    })?;
                    Ok(SelectionDescriptor::FunctionResult { alias })
                }
                (kind, _) => Err(CramponError::Classification {
                    position,
                    reason: format!("{kind} flag does not match the select entry").into(),
                }),
            }
        })
        .collect()
}
