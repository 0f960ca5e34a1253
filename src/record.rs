//! Ordered JSON object for one projected row.
//!
//! Keys serialize in column order. `serde_json::Map` sorts its keys unless the
//! `preserve_order` feature is on, so records carry their own sequence of fields
//! and a dedicated `Serialize` impl.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::FieldValue;

/// One column's projected value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// A projected row: fields in source column order, names unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<Field>,
    /// Name → position in `fields`.
    index: HashMap<String, usize>,
}

impl Record {
    pub fn with_capacity(n: usize) -> Self {
        Record {
            fields: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        }
    }

    /// Append a field. A repeated name overwrites the earlier value in its original slot.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            self.fields[pos].value = value;
            return;
        }
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push(Field { name, value });
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.index.get(name).map(|&pos| &self.fields[pos].value)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let mut r = Record::default();
        r.insert("zeta", FieldValue::Int(1));
        r.insert("alpha", FieldValue::Null);
        r.insert("mid", FieldValue::Text("x\"y".into()));
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"zeta":1,"alpha":null,"mid":"x\"y"}"#
        );
    }

    #[test]
    fn empty_record_is_empty_object() {
        assert_eq!(serde_json::to_string(&Record::default()).unwrap(), "{}");
    }

    #[test]
    fn duplicate_name_keeps_first_slot_and_last_value() {
        let mut r = Record::default();
        r.insert("id", FieldValue::Int(1));
        r.insert("name", FieldValue::Text("a".into()));
        r.insert("id", FieldValue::Int(2));
        assert_eq!(r.len(), 2);
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(r.get("id"), Some(&FieldValue::Int(2)));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"id":2,"name":"a"}"#);
    }

    #[test]
    fn wide_row_with_repeats_keeps_order() {
        let mut r = Record::with_capacity(4000);
        for pass in 0..2i64 {
            for col in 0..2000i64 {
                r.insert(format!("c{}", col), FieldValue::Int(pass * 10_000 + col));
            }
        }
        assert_eq!(r.len(), 2000);
        assert_eq!(r.names().next(), Some("c0"));
        assert_eq!(r.names().last(), Some("c1999"));
        assert_eq!(r.get("c0"), Some(&FieldValue::Int(10_000)));
        assert_eq!(r.get("c1999"), Some(&FieldValue::Int(11_999)));
        assert_eq!(r.get("c2000"), None);
        let out = serde_json::to_string(&r).unwrap();
        assert!(out.starts_with(r#"{"c0":10000,"c1":10001,"#), "{}", &out[..40]);
    }
}
