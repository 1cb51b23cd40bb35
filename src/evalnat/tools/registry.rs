use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::evalnat::tools::model::{CompetencyKey, PartialRecord, SchoolId, SchoolRecord, UnitId};

/// Schools accumulated across source units, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchoolRegistry {
    schools: Vec<SchoolRecord>,
    #[serde(skip)]
    index: HashMap<SchoolId, usize>,
}

impl SchoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registry extended with `partials`.
    pub fn merge<I>(mut self, partials: I) -> Self
    where
        I: IntoIterator<Item = PartialRecord>,
    {
        for partial in partials {
            self.absorb(partial);
        }
        self
    }

    /// Unions one partial record into the registry.
    ///
    /// A partial without results is ignored so that a unit which found
    /// nothing for a school never creates an empty record. Returns whether
    /// the registry changed. Colliding keys keep the latest value; the first
    /// non-empty name sticks.
    pub fn absorb(&mut self, partial: PartialRecord) -> bool {
        if partial.is_empty() {
            return false;
        }

        let PartialRecord { id, name, results } = partial;
        let position = match self.index.get(&id) {
            Some(&position) => position,
            None => {
                self.schools.push(SchoolRecord::new(id.clone(), String::new()));
                self.index.insert(id, self.schools.len() - 1);
                self.schools.len() - 1
            }
        };
        let school = &mut self.schools[position];
        if school.name.is_empty() {
            school.name = name;
        }
        school.results.extend(results);
        true
    }

    pub fn all(&self) -> &[SchoolRecord] {
        &self.schools
    }

    pub fn get(&self, id: &str) -> Option<&SchoolRecord> {
        self.index.get(id).map(|&position| &self.schools[position])
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    /// Every competency key seen, grouped by unit. Computed on each call.
    pub fn by_level_subject(&self) -> BTreeMap<UnitId, BTreeSet<CompetencyKey>> {
        let mut groups: BTreeMap<UnitId, BTreeSet<CompetencyKey>> = BTreeMap::new();
        for school in &self.schools {
            for key in school.results.keys() {
                groups.entry(key.unit()).or_default().insert(key.clone());
            }
        }
        groups
    }

    /// Every competency key seen across all schools, sorted.
    pub fn keys(&self) -> BTreeSet<CompetencyKey> {
        self.schools
            .iter()
            .flat_map(|school| school.results.keys().cloned())
            .collect()
    }
}
