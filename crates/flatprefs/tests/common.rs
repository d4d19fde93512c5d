//! Shared models and helpers for codec integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use flatprefs::storage::StoredValue;
use flatprefs::{MemoryStore, Preferences};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveContainer {
    pub a: bool,
    pub b: i8,
    pub c: i16,
    pub d: i32,
    pub e: i64,
    pub f: f32,
    pub g: f64,
    pub h: char,
    pub i: String,
}

impl Default for PrimitiveContainer {
    fn default() -> Self {
        Self { a: true, b: 4, c: 8, d: -12, e: -1234, f: 12.6, g: 12e3, h: '?', i: "foobar".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleContainer {
    pub bar: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithOptional {
    #[serde(default = "default_foo")]
    pub foo: String,
}

fn default_foo() -> String {
    "foo".to_owned()
}

impl Default for WithOptional {
    fn default() -> Self {
        Self { foo: default_foo() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithNullable {
    pub foo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub simple: SimpleContainer,
    pub optional: WithOptional,
    pub nullable: Option<SimpleContainer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Sealed {
    #[serde(rename = "sealed1")]
    First { a: bool },
    #[serde(rename = "sealed2")]
    Second { b: i32 },
    #[serde(rename = "sealed3")]
    Third {},
}

pub fn prefs() -> Preferences<MemoryStore> {
    Preferences::new(MemoryStore::new())
}

pub fn snapshot(prefs: &Preferences<MemoryStore>) -> BTreeMap<String, StoredValue> {
    prefs.store().snapshot().expect("failed to snapshot store")
}

pub fn keys(prefs: &Preferences<MemoryStore>) -> Vec<String> {
    snapshot(prefs).into_keys().collect()
}
