//! Pagination request and response shapes

use crate::core::error::ResourceError;
use crate::core::query::QueryBag;
use serde::{Deserialize, Serialize};

/// Sort direction of an [`Order`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Page request sent as query parameters (`page`, `size`, `sort`)
///
/// Each sort key becomes its own `sort` entry; with no sort keys the
/// parameter is omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,

    /// Number of items per page
    pub size: u32,

    pub sort: Vec<Order>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    /// Request page `page` of `size` items
    ///
    /// A `size` of 0 is raised to 1: servers reject empty pages. The public
    /// field is not checked, so build requests through this constructor.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, order: Order) -> Self {
        self.sort.push(order);
        self
    }

    pub fn to_query_bag(&self) -> Result<QueryBag, ResourceError> {
        QueryBag::from_serialize(self)
    }
}

/// A page of a server-paginated result
///
/// Mirrors what the server returns; nothing is checked client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub last: bool,
    pub total_pages: u64,
    pub total_elements: u64,
    pub size: u64,

    /// Page number
    pub number: u64,
    pub first: bool,

    /// Number of elements in the current page
    pub number_of_elements: u64,
}
