//! Free-text address input.

/// An address as the user typed it, split into street, city and country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub street: String,
    pub city: String,
    pub country: String,
}

impl AddressQuery {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    /// Whether the street part is missing. A city alone is too coarse to
    /// pick a station from.
    pub fn is_blank(&self) -> bool {
        self.street.trim().is_empty()
    }

    /// The single-line query sent to the geocoder.
    pub fn to_query(&self) -> String {
        [&self.street, &self.city, &self.country]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
