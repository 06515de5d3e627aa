use crate::error::{HeredityError, Result};
use crate::PersonIdx;
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::debug;

/// A member of the pedigree as it was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub mother: Option<String>,
    pub father: Option<String>,
    /// `None` when the trait was not observed
    pub has_trait: Option<bool>,
}

impl Person {
    /// A founder with an unobserved trait
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            mother: None,
            father: None,
            has_trait: None,
        }
    }

    pub fn with_parents(mut self, mother: &str, father: &str) -> Self {
        self.mother = Some(mother.into());
        self.father = Some(father.into());
        self
    }

    pub fn with_trait(mut self, has_trait: bool) -> Self {
        self.has_trait = Some(has_trait);
        self
    }

    pub fn is_founder(&self) -> bool {
        self.mother.is_none() && self.father.is_none()
    }
}

/// Everyone recorded, keyed by name.
///
/// Remembers the order records were observed in, which is the order people
/// are indexed and reported in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    people: BTreeMap<String, Person>,
    order: Vec<String>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Person> {
        self.people.get(name)
    }

    /// Names in the order they were first observed
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Adds a single `Person` to the population.
    ///
    /// Repeating an identical record is harmless. A second record for the
    /// same name that disagrees with the first is rejected.
    pub fn observe_person(&mut self, person: Person) -> Result<()> {
        match self.people.get(&person.name) {
            Some(existing) if *existing != person => Err(HeredityError::ConflictingRecords {
                person: person.name,
            }),
            Some(_) => Ok(()),
            None => {
                self.order.push(person.name.clone());
                self.people.insert(person.name.clone(), person);
                Ok(())
            }
        }
    }

    /// Observe every record in the argument.
    pub fn observe<I>(&mut self, observable: I) -> Result<()>
    where
        I: Iterator<Item = Result<Person>>,
    {
        for person in observable {
            self.observe_person(person?)?;
        }
        Ok(())
    }
}

/// A validated, immutable view of a `Population`.
///
/// People are addressed by `PersonIdx`, which follows the record order of
/// the population. Every non-founder has both parents present and the parent
/// graph is acyclic.
#[derive(Debug, Clone)]
pub struct Pedigree {
    people: Vec<Person>,
    index: HashMap<String, PersonIdx>,
    parents: Vec<Option<(PersonIdx, PersonIdx)>>,
}

impl Pedigree {
    pub fn new(population: Population) -> Result<Self> {
        let Population { mut people, order } = population;
        let people: Vec<Person> = order.iter().filter_map(|name| people.remove(name)).collect();
        let index: HashMap<String, PersonIdx> = people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        let mut parents = Vec::with_capacity(people.len());
        for person in &people {
            parents.push(match (&person.mother, &person.father) {
                (None, None) => None,
                (Some(mother), Some(father)) => {
                    let lookup = |parent: &str| {
                        index.get(parent).copied().ok_or_else(|| {
                            HeredityError::malformed(format!(
                                "{} lists unknown parent {}",
                                person.name, parent
                            ))
                        })
                    };
                    let (m, f) = (lookup(mother.as_str())?, lookup(father.as_str())?);
                    if m == f {
                        return Err(HeredityError::malformed(format!(
                            "{} lists {} as both mother and father",
                            person.name, mother
                        )));
                    }
                    Some((m, f))
                }
                _ => {
                    return Err(HeredityError::malformed(format!(
                        "{} has only one recorded parent",
                        person.name
                    )))
                }
            });
        }

        let pedigree = Self {
            people,
            index,
            parents,
        };
        pedigree.check_acyclic()?;
        debug!(
            people = pedigree.len(),
            founders = pedigree.founders().count(),
            "pedigree validated"
        );
        Ok(pedigree)
    }

    /// Kahn's algorithm over parent -> child edges. Anyone left unvisited
    /// is their own ancestor.
    fn check_acyclic(&self) -> Result<()> {
        let mut children: Vec<Vec<PersonIdx>> = vec![vec![]; self.len()];
        let mut pending: Vec<u8> = vec![0; self.len()];
        for (child, parents) in self.parents.iter().enumerate() {
            if let Some((m, f)) = parents {
                children[*m].push(child);
                children[*f].push(child);
                pending[child] = 2;
            }
        }

        let mut queue: VecDeque<PersonIdx> = self.founders().collect();
        let mut visited = 0;
        while let Some(idx) = queue.pop_front() {
            visited += 1;
            for &child in &children[idx] {
                pending[child] -= 1;
                if pending[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        if visited == self.len() {
            return Ok(());
        }
        let culprit = pending
            .iter()
            .position(|&p| p > 0)
            .map(|i| self.people[i].name.as_str())
            .unwrap_or_default();
        Err(HeredityError::malformed(format!(
            "parent cycle through {}",
            culprit
        )))
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn person(&self, idx: PersonIdx) -> &Person {
        &self.people[idx]
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn index_of(&self, name: &str) -> Option<PersonIdx> {
        self.index.get(name).copied()
    }

    /// `(mother, father)` of a non-founder
    pub fn parents(&self, idx: PersonIdx) -> Option<(PersonIdx, PersonIdx)> {
        self.parents[idx]
    }

    pub fn founders(&self) -> impl Iterator<Item = PersonIdx> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| i)
    }

    /// The observed trait of every person, in index order
    pub fn evidence(&self) -> Vec<Option<bool>> {
        self.people.iter().map(|p| p.has_trait).collect()
    }
}
