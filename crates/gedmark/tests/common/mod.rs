//! GEDCOM-like domain model shared by the integration tests

#![allow(dead_code, clippy::unwrap_used)]

use gedmark::Accessible;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
#[gedmark(method(name = "person", call = person_by_id, args(String), returns(Option<Person>)))]
#[gedmark(method(name = "person", call = first_person, returns(Option<Person>)))]
pub struct Gedcom {
    pub header: Option<Header>,
    pub people: Vec<Person>,
    pub families: Vec<Family>,
    pub sources: Vec<Source>,
    pub notes: Vec<Note>,
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Gedcom {
    fn person_by_id(&self, id: String) -> Option<Person> {
        self.people.iter().find(|p| p.id == id).cloned()
    }

    fn first_person(&self) -> Option<Person> {
        self.people.first().cloned()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
pub struct Header {
    pub source: Option<String>,
    pub version: Option<String>,
    pub charset: Option<String>,
    pub submitter_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
#[gedmark(method(name = "name", call = name_at, args(usize), returns(Name), fallible))]
pub struct Person {
    pub id: String,
    pub names: Vec<Name>,
    pub sex: Option<String>,
    pub event_facts: Vec<EventFact>,
    pub notes: Vec<Note>,
    pub family_refs: Vec<String>,
    pub uid: Option<String>,
}

impl Person {
    fn name_at(&self, index: usize) -> Result<Name, String> {
        self.names
            .get(index)
            .cloned()
            .ok_or_else(|| format!("no name at {index}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
pub struct Name {
    pub value: String,
    #[serde(rename = "type")]
    #[gedmark(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
pub struct EventFact {
    pub tag: String,
    pub date: Option<String>,
    pub place: Option<String>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
pub struct Family {
    pub id: String,
    pub husband_ref: Option<String>,
    pub wife_ref: Option<String>,
    pub child_refs: Vec<String>,
    pub event_facts: Vec<EventFact>,
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
pub struct Source {
    pub id: String,
    pub title: Option<String>,
    #[gedmark(skip)]
    pub rin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Accessible)]
#[serde(default)]
pub struct Note {
    pub value: String,
}

/// Parse the bundled fixture
pub fn load() -> Gedcom {
    serde_json::from_str(include_str!("../fixtures/dummy.json")).unwrap()
}
