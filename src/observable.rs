use crate::error::{HeredityError, Result};
use crate::pedigree::Person;
use csv;
use std::io::Read;

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Name,
    Mother,
    Father,
    Trait,
    Ignored,
}

/// Produces `Person`s from delimited pedigree records
///
/// `Csv` implements Iterator so it can be passed
/// directly to `Population::observe()`
pub struct Csv {
    records: csv::StringRecordsIntoIter<Box<dyn Read>>,
    fields: Vec<Field>,
}

impl Csv {
    fn new(records: csv::StringRecordsIntoIter<Box<dyn Read>>, fields: Vec<Field>) -> Self {
        Self { records, fields }
    }

    fn person(&self, line: u64, row: &csv::StringRecord) -> Result<Person> {
        let mut person = Person::new("");
        for (field, value) in self.fields.iter().zip(row.iter()) {
            let value = value.trim();
            let optional = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
            match field {
                Field::Name => person.name = value.to_string(),
                Field::Mother => person.mother = optional,
                Field::Father => person.father = optional,
                Field::Trait => person.has_trait = parse_trait(line, value)?,
                Field::Ignored => {}
            }
        }
        if person.name.is_empty() {
            return Err(HeredityError::parse(line, "record has no name"));
        }
        Ok(person)
    }
}

/// `"1"` has the trait, `"0"` does not, empty is unknown
fn parse_trait(line: u64, flag: &str) -> Result<Option<bool>> {
    match flag {
        "1" => Ok(Some(true)),
        "0" => Ok(Some(false)),
        "" => Ok(None),
        other => Err(HeredityError::parse(
            line,
            format!("trait flag must be 0, 1 or empty, found {:?}", other),
        )),
    }
}

impl Iterator for Csv {
    type Item = Result<Person>;

    fn next(&mut self) -> Option<Result<Person>> {
        let row = match self.records.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err.into())),
        };
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        Some(self.person(line, &row))
    }
}

pub struct CsvBuilder {
    headers: bool,
    delimiter: u8,
    name_field: String,
    mother_field: String,
    father_field: String,
    trait_field: String,
}

impl CsvBuilder {
    /// Construct a new Csv builder
    ///
    /// Defaults to comma separated records with a `name,mother,father,trait`
    /// header.
    pub fn new() -> Self {
        Self {
            headers: true,
            delimiter: b',',
            name_field: "name".to_owned(),
            mother_field: "mother".to_owned(),
            father_field: "father".to_owned(),
            trait_field: "trait".to_owned(),
        }
    }

    /// Without headers columns are read positionally as name, mother,
    /// father, trait.
    pub fn headers(&mut self, headers: bool) -> &mut Self {
        self.headers = headers;
        self
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn name_field(&mut self, name_field: &str) -> &mut Self {
        self.name_field = name_field.to_owned();
        self
    }

    pub fn mother_field(&mut self, mother_field: &str) -> &mut Self {
        self.mother_field = mother_field.to_owned();
        self
    }

    pub fn father_field(&mut self, father_field: &str) -> &mut Self {
        self.father_field = father_field.to_owned();
        self
    }

    pub fn trait_field(&mut self, trait_field: &str) -> &mut Self {
        self.trait_field = trait_field.to_owned();
        self
    }

    pub fn from_reader(&self, reader: Box<dyn Read>) -> Result<Csv> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.headers)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);

        let fields = if self.headers {
            let fields: Vec<Field> = rdr
                .headers()?
                .iter()
                .map(|s| match s.trim() {
                    s if s == self.name_field => Field::Name,
                    s if s == self.mother_field => Field::Mother,
                    s if s == self.father_field => Field::Father,
                    s if s == self.trait_field => Field::Trait,
                    _ => Field::Ignored,
                })
                .collect();
            if !fields.contains(&Field::Name) {
                return Err(HeredityError::parse(
                    1,
                    format!("header has no {:?} column", self.name_field),
                ));
            }
            fields
        } else {
            vec![Field::Name, Field::Mother, Field::Father, Field::Trait]
        };

        Ok(Csv::new(rdr.into_records(), fields))
    }
}

impl Default for CsvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Population;
    use std::error::Error;

    const FAMILY: &str = "name,mother,father,trait\n\
                          Harry,Lily,James,\n\
                          James,,,1\n\
                          Lily,,,0\n";

    #[test]
    fn test_csv_with_header_reads_people() -> Result<(), Box<dyn Error>> {
        let people = CsvBuilder::new()
            .from_reader(Box::new(FAMILY.as_bytes()))?
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(
            people,
            vec![
                Person::new("Harry").with_parents("Lily", "James"),
                Person::new("James").with_trait(true),
                Person::new("Lily").with_trait(false),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_csv_fills_population() -> Result<(), Box<dyn Error>> {
        let mut population = Population::new();
        population.observe(CsvBuilder::new().from_reader(Box::new(FAMILY.as_bytes()))?)?;
        assert_eq!(
            population.names().collect::<Vec<_>>(),
            vec!["Harry", "James", "Lily"]
        );
        Ok(())
    }

    #[test]
    fn test_csv_custom_columns() -> Result<(), Box<dyn Error>> {
        let data = "id\tmum\tdad\taffected\textra\nTom\t\t\t1\tx\n";
        let people = CsvBuilder::new()
            .delimiter(b'\t')
            .name_field("id")
            .mother_field("mum")
            .father_field("dad")
            .trait_field("affected")
            .from_reader(Box::new(data.as_bytes()))?
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(people, vec![Person::new("Tom").with_trait(true)]);
        Ok(())
    }

    #[test]
    fn test_csv_without_headers() -> Result<(), Box<dyn Error>> {
        let people = CsvBuilder::new()
            .headers(false)
            .from_reader(Box::new("Ann,,,\n".as_bytes()))?
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(people, vec![Person::new("Ann")]);
        Ok(())
    }

    #[test]
    fn test_csv_bad_trait_flag() -> Result<(), Box<dyn Error>> {
        let data = "name,mother,father,trait\nAnn,,,yes\n";
        let result = CsvBuilder::new()
            .from_reader(Box::new(data.as_bytes()))?
            .collect::<Result<Vec<_>>>();
        assert!(matches!(result, Err(HeredityError::Parse { line: 2, .. })));
        Ok(())
    }

    #[test]
    fn test_csv_missing_name_column() {
        let result = CsvBuilder::new().from_reader(Box::new("who,trait\nAnn,1\n".as_bytes()));
        assert!(matches!(result, Err(HeredityError::Parse { .. })));
    }
}
