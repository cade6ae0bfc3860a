//! Record-oriented bibliography model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::person::Person;

/// Roles whose values are person lists rather than plain fields
pub const PERSON_ROLES: [&str; 2] = ["author", "editor"];

/// A single field (name-value pair). Names are always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// One bibliographic entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub entry_type: String,
    fields: Vec<Field>,
    persons: BTreeMap<String, Vec<Person>>,
}

impl Record {
    /// Create a new record with no fields. The entry type is lowercased.
    pub fn new(key: impl Into<String>, entry_type: &str) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.to_lowercase(),
            fields: Vec::new(),
            persons: BTreeMap::new(),
        }
    }

    /// Set a field, replacing any existing value under the same name
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field { name, value }),
        }
    }

    /// Get a field value by name (case-insensitive)
    pub fn get_field(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Fields in insertion order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Append a person under `role`
    pub fn add_person(&mut self, role: &str, person: Person) {
        self.persons
            .entry(role.to_lowercase())
            .or_default()
            .push(person);
    }

    /// Persons under `role`, empty if none
    pub fn persons(&self, role: &str) -> &[Person] {
        self.persons
            .get(&role.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All roles with their person lists
    pub fn person_roles(&self) -> impl Iterator<Item = (&str, &[Person])> {
        self.persons
            .iter()
            .map(|(role, persons)| (role.as_str(), persons.as_slice()))
    }

    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }
}

/// Insertion-ordered collection of records with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    entries: Vec<Record>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A record with the same key is replaced in place and
    /// returned.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        match self.entries.iter_mut().find(|r| r.key == record.key) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.entries.push(record);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.iter().find(|r| r.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.entries.iter()
    }

    /// Keys in iteration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Database {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
