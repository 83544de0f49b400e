use crate::error::TfResult;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// A city is identified by its index in the store; only its position is stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn distance(&self, other: &City) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Append/clear-only city collection. Hands out immutable snapshots so a
/// running job never sees later edits.
#[derive(Debug, Clone, Default)]
pub struct CityStore {
    cities: Vec<City>,
}

impl CityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn push(&mut self, city: City) {
        self.cities.push(city);
    }

    pub fn extend<I: IntoIterator<Item = City>>(&mut self, cities: I) {
        self.cities.extend(cities);
    }

    pub fn clear(&mut self) {
        self.cities.clear();
    }

    pub fn snapshot(&self) -> Arc<[City]> {
        Arc::from(self.cities.as_slice())
    }
}

/// Anything that can produce cities to append: a file, user clicks, a generator.
pub trait CitySource {
    fn read_cities(self) -> TfResult<Vec<City>>;
}

impl CitySource for Vec<City> {
    fn read_cities(self) -> TfResult<Vec<City>> {
        Ok(self)
    }
}

/// Comma separated `x,y` rows with a header line.
pub struct CsvCitySource<R> {
    reader: R,
}

impl CsvCitySource<std::fs::File> {
    pub fn from_path<P: Into<PathBuf>>(path: P) -> TfResult<Self> {
        let path = path.into();
        debug!("Opening city list {:?}", path);
        Ok(Self {
            reader: std::fs::File::open(&path)?,
        })
    }
}

impl<R: Read> CsvCitySource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> CitySource for CsvCitySource<R> {
    fn read_cities(self) -> TfResult<Vec<City>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(self.reader);

        let mut cities = Vec::new();
        for record in rdr.deserialize() {
            let city: City = record?;
            cities.push(city);
        }
        Ok(cities)
    }
}

/// Uniformly scattered cities inside a `width` x `height` box.
#[derive(Debug, Clone, Copy)]
pub struct RandomCitySource {
    pub count: usize,
    pub width: f64,
    pub height: f64,
    pub seed: Option<u64>,
}

impl CitySource for RandomCitySource {
    fn read_cities(self) -> TfResult<Vec<City>> {
        let mut rng = if let Some(s) = self.seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };
        Ok((0..self.count)
            .map(|_| City::new(rng.f64() * self.width, rng.f64() * self.height))
            .collect())
    }
}
