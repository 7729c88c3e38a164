//! Shared models and an in-memory driver for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use crampon::Driver;
use crampon::postgres::{PgRow, PostgresValue, Statement};
use crampon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: String,
    pub beta: bool,
}

pg_model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserDemo {
        pub id: i32 => Int { primary_key, autoincrement },
        pub name: String => Text,
        pub email: Option<String> => Text,
        pub preferences: Preferences => Jsonb { json },
        pub session_token: Option<String> { exclude },
    }
}

pg_model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Post in "posts" {
        pub id: i32 => Int { primary_key, autoincrement },
        pub author_id: i32 => Int,
        pub title: String => Text,
        pub views: i64 => BigInt,
    }
}

pg_model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct AuditEntry in "audit_log" {
        pub message: String => Text,
    }
}

pub fn user(name: &str) -> UserDemo {
    UserDemo {
        id: 0,
        name: name.into(),
        email: None,
        preferences: Preferences::default(),
        session_token: None,
    }
}

/// Raw row as the driver would return it for `select(UserDemo::all())`.
pub fn user_row(id: i32, name: &str, preferences: &str) -> Vec<(&'static str, PostgresValue)> {
    vec![
        ("c0_0", PostgresValue::Integer(id)),
        ("c0_1", PostgresValue::Text(name.into())),
        ("c0_2", PostgresValue::Null),
        ("c0_3", PostgresValue::Text(preferences.into())),
    ]
}

/// Driver that records every statement and replays queued responses.
#[derive(Debug, Default)]
pub struct MockDriver {
    statements: Mutex<Vec<Statement>>,
    rows: Mutex<VecDeque<Vec<PgRow>>>,
    affected: Mutex<VecDeque<u64>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the rows returned by the next `fetch`.
    pub fn push_rows(&self, rows: Vec<PgRow>) -> &Self {
        self.rows.lock().expect("rows lock").push_back(rows);
        self
    }

    /// Queues the count returned by the next `execute`.
    pub fn push_affected(&self, count: u64) -> &Self {
        self.affected.lock().expect("affected lock").push_back(count);
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().expect("statements lock").clone()
    }

    fn record(&self, sql: &str, params: &[PostgresValue]) {
        self.statements
            .lock()
            .expect("statements lock")
            .push(Statement::new(sql, params.to_vec()));
    }
}

impl Driver for MockDriver {
    async fn fetch(&self, sql: &str, params: &[PostgresValue]) -> crampon::Result<Vec<PgRow>> {
        self.record(sql, params);
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .pop_front()
            .unwrap_or_default())
    }

    async fn execute(&self, sql: &str, params: &[PostgresValue]) -> crampon::Result<u64> {
        self.record(sql, params);
        Ok(self
            .affected
            .lock()
            .expect("affected lock")
            .pop_front()
            .unwrap_or(1))
    }
}
