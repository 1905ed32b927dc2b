//! Resource identifiers.
//!
//! Ids travel as a single URL path segment. `Missing`, the empty string and
//! the number zero count as "not provided" and are rejected before a request
//! is built.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    Missing,
    Number(i64),
    Text(String),
}

impl ResourceId {
    pub fn is_provided(&self) -> bool {
        match self {
            ResourceId::Missing => false,
            ResourceId::Number(n) => *n != 0,
            ResourceId::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Missing => Ok(()),
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ResourceId {
                fn from(n: $ty) -> Self {
                    ResourceId::Number(i64::from(n))
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ResourceId {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => ResourceId::Number(n),
            Err(_) => ResourceId::Text(n.to_string()),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Text(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId::Text(s)
    }
}

impl From<&String> for ResourceId {
    fn from(s: &String) -> Self {
        ResourceId::Text(s.clone())
    }
}

impl From<Uuid> for ResourceId {
    fn from(id: Uuid) -> Self {
        ResourceId::Text(id.to_string())
    }
}

impl<T: Into<ResourceId>> From<Option<T>> for ResourceId {
    fn from(id: Option<T>) -> Self {
        id.map_or(ResourceId::Missing, Into::into)
    }
}
