//! Back-office resources.

use std::fmt;
use std::str::FromStr;

/// A resource collection on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Products,
    Categories,
    Banners,
    Offers,
    Orders,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Self::Products,
        Self::Categories,
        Self::Banners,
        Self::Offers,
        Self::Orders,
        Self::Users,
    ];

    /// Path segment under the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Products => "product",
            Self::Categories => "category",
            Self::Banners => "banner",
            Self::Offers => "offer",
            Self::Orders => "order",
            Self::Users => "user",
        }
    }

    /// Plural name, also the default grid id for the resource's list.
    pub fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Banners => "banners",
            Self::Offers => "offers",
            Self::Orders => "orders",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = String;

    /// Accepts the plural name or the path segment, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.name() == s || r.path() == s)
            .ok_or_else(|| format!("unknown resource `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("products".parse::<Resource>(), Ok(Resource::Products));
        assert_eq!("Category".parse::<Resource>(), Ok(Resource::Categories));
        assert!("invoices".parse::<Resource>().is_err());
    }
}
