//! Entity types shared by the integration tests.

use cairn::{
    stmt::{Record, Type},
    Describe, Descriptor, Field, Many, RecordExt, Ref, Result, Storable,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    pub id: Option<i64>,
    pub short_name: String,
    pub name: String,
}

impl Describe for Country {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .table("countries")
            .key("id")
            .column("short_name", Type::String)
            .column("name", Type::String)
    }
}

impl Storable for Country {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            short_name: record.load("short_name")?,
            name: record.load("name")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("short_name", &self.short_name)
            .with("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub id: Option<i64>,
    pub city: String,
    pub country: Ref<Country>,
}

impl Describe for Location {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .key("id")
            .column("city", Type::String)
            .reference::<Country>("country")
            .nullable()
    }
}

impl Storable for Location {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            city: record.load("city")?,
            country: record.load("country")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("city", &self.city)
            .with("country", self.country.to_value())
    }
}

/// Animals live somewhere; the location is created and updated with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animal {
    pub id: Option<i64>,
    pub name: String,
    pub location: Ref<Location>,
}

impl Describe for Animal {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .key("id")
            .column("name", Type::String)
            .reference::<Location>("location")
            .nullable()
            .auto_create()
            .auto_update()
    }
}

impl Storable for Animal {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            name: record.load("name")?,
            location: record.load("location")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", &self.name)
            .with("location", self.location.to_value())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cat {
    pub id: Option<i64>,
    pub name: String,
    pub location: Ref<Location>,
    pub lives: i64,
    pub indoor: bool,

    /// Never stored
    pub mood: String,
}

impl Describe for Cat {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .extends::<Animal>()
            .key("id")
            .column("lives", Type::I64)
            .column("indoor", Type::Bool)
            .not_in_db("mood")
    }
}

impl Storable for Cat {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            name: record.load("name")?,
            location: record.load("location")?,
            lives: record.load("lives")?,
            indoor: record.load("indoor")?,
            mood: String::new(),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", &self.name)
            .with("location", self.location.to_value())
            .with("lives", self.lives)
            .with("indoor", self.indoor)
    }

    fn write_back(&mut self, record: Record) -> Result<()> {
        let mood = std::mem::take(&mut self.mood);
        *self = Self::load(record)?;
        self.mood = mood;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toy {
    pub id: Option<i64>,
    pub label: String,
}

impl Describe for Toy {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .key("id")
            .column("label", Type::String)
    }
}

impl Storable for Toy {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            label: record.load("label")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("label", &self.label)
    }
}

/// Owners point at a pet without owning it, and fully manage their toys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Owner {
    pub id: Option<i64>,
    pub name: String,
    pub pet: Ref<Animal>,

    /// Key of a country, stored without a loadable reference
    pub country_id: Option<i64>,

    pub toys: Many<Toy>,
}

impl Describe for Owner {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .key("id")
            .column("name", Type::String)
            .reference::<Animal>("pet")
            .nullable()
            .foreign_key::<Country>("country_id")
            .nullable()
            .collection::<Toy>("toys")
            .auto_crud()
    }
}

impl Storable for Owner {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            name: record.load("name")?,
            pet: record.load("pet")?,
            country_id: record.load("country_id")?,
            toys: record.load("toys")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", &self.name)
            .with("pet", self.pet.to_value())
            .with("country_id", self.country_id)
            .with("toys", self.toys.to_value())
    }
}

/// A kennel owns its guard animal. Its toys must already be saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kennel {
    pub id: Option<i64>,
    pub name: String,
    pub guard: Ref<Animal>,
    pub toys: Many<Toy>,
}

impl Describe for Kennel {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .key("id")
            .column("name", Type::String)
            .reference::<Animal>("guard")
            .auto_create()
            .auto_delete()
            .collection::<Toy>("toys")
    }
}

impl Storable for Kennel {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            name: record.load("name")?,
            guard: record.load("guard")?,
            toys: record.load("toys")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", &self.name)
            .with("guard", self.guard.to_value())
            .with("toys", self.toys.to_value())
    }
}

/// A shelter may house one animal, which leaves with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shelter {
    pub id: Option<i64>,
    pub name: String,
    pub resident: Ref<Animal>,
}

impl Describe for Shelter {
    fn describe() -> Descriptor {
        Descriptor::new::<Self>()
            .key("id")
            .column("name", Type::String)
            .reference::<Animal>("resident")
            .nullable()
            .auto_create()
            .auto_delete()
    }
}

impl Storable for Shelter {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn load(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: record.load("id")?,
            name: record.load("name")?,
            resident: record.load("resident")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", &self.name)
            .with("resident", self.resident.to_value())
    }
}

pub fn france() -> Country {
    Country {
        short_name: "FR".to_string(),
        name: "France".to_string(),
        ..Default::default()
    }
}

pub fn cat(name: &str, lives: i64) -> Cat {
    Cat {
        name: name.to_string(),
        lives,
        ..Default::default()
    }
}

pub fn toy(label: &str) -> Toy {
    Toy {
        label: label.to_string(),
        ..Default::default()
    }
}
