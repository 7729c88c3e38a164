//! Precomputed model metadata.
//!
//! Every model owns one `'static` [`TableMeta`] listing its fields in
//! declaration order. Query builders read it to render column lists, and the
//! result caster reads it to rebuild model instances from raw rows.

/// Metadata describing a model's backing table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableMeta {
    /// Table name as it appears in SQL
    pub name: &'static str,
    /// Rust type name of the model
    pub model: &'static str,
    /// Fields in declaration order
    pub fields: &'static [FieldMeta],
}

impl TableMeta {
    pub const fn new(
        name: &'static str,
        model: &'static str,
        fields: &'static [FieldMeta],
    ) -> Self {
        Self {
            name,
            model,
            fields,
        }
    }

    /// The primary key field, if the model declares one.
    pub fn primary_key(&self) -> Option<&'static FieldMeta> {
        self.fields.iter().find(|field| field.primary_key)
    }

    /// Looks up a field by its Rust name.
    pub fn field(&self, name: &str) -> Option<&'static FieldMeta> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields that are read from and written to the database.
    pub fn stored_fields(&self) -> impl Iterator<Item = &'static FieldMeta> {
        self.fields.iter().filter(|field| !field.excluded)
    }
}

/// Metadata describing a single model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Owning table name
    pub table: &'static str,
    /// Rust field name
    pub name: &'static str,
    /// Column name in the database
    pub storage_key: &'static str,
    /// Declared SQL type, e.g. `INTEGER`
    pub sql_type: &'static str,
    pub primary_key: bool,
    pub autoincrement: bool,
    /// Value is stored as JSON text and decoded on read
    pub json: bool,
    /// Field lives only on the Rust side and never touches SQL
    pub excluded: bool,
}

impl FieldMeta {
    pub const fn new(table: &'static str, name: &'static str, sql_type: &'static str) -> Self {
        Self {
            table,
            name,
            storage_key: name,
            sql_type,
            primary_key: false,
            autoincrement: false,
            json: false,
            excluded: false,
        }
    }

    pub const fn storage_key(mut self, key: &'static str) -> Self {
        self.storage_key = key;
        self
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub const fn exclude(mut self) -> Self {
        self.excluded = true;
        self
    }
}
