use crate::error::{Error, ErrorCode, Result};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Absolute identifier of a shape, `namespace#Name`, optionally pointing at a
/// member, `namespace#Name$member`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    namespace: Box<str>,
    name: Box<str>,
    member: Option<Box<str>>,
}

impl ShapeId {
    /// Creates a shape id from its parts.
    ///
    /// Fails if either part is empty or contains one of the separators `#`
    /// and `$`.
    pub fn new(namespace: &str, name: &str) -> Result<Self> {
        if !valid_part(namespace) || !valid_part(name) {
            return Err(invalid(&format!("{}#{}", namespace, name)));
        }
        Ok(ShapeId {
            namespace: namespace.into(),
            name: name.into(),
            member: None,
        })
    }

    /// Parses an id that may be relative.
    ///
    /// `Foo` resolves against `namespace`, while `other.ns#Foo` is taken as is.
    /// A relative id without a namespace to resolve against is an error.
    pub fn from_optional_namespace(namespace: Option<&str>, id: &str) -> Result<Self> {
        if id.contains('#') {
            return id.parse();
        }
        match namespace {
            Some(namespace) => {
                let (name, member) = match id.split_once('$') {
                    Some((name, member)) => (name, Some(member)),
                    None => (id, None),
                };
                let shape = tri!(ShapeId::new(namespace, name));
                match member {
                    Some(member) => shape.with_member(member),
                    None => Ok(shape),
                }
            }
            None => Err(invalid(id)),
        }
    }

    /// The id of member `member` of this shape.
    pub fn with_member(&self, member: &str) -> Result<Self> {
        if !valid_part(member) {
            return Err(invalid(&format!("{}${}", self, member)));
        }
        Ok(ShapeId {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.into()),
        })
    }

    /// The id of the shape that contains this member, or a copy of the id for
    /// a non-member id.
    pub fn without_member(&self) -> Self {
        ShapeId {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }

    /// The part before `#`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The part between `#` and `$`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The part after `$`, if this is a member id.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }
}

fn valid_part(part: &str) -> bool {
    !part.is_empty() && !part.contains(&['#', '$'][..])
}

#[cold]
fn invalid(id: &str) -> Error {
    Error::data(ErrorCode::InvalidShapeId(id.into()))
}

impl FromStr for ShapeId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self> {
        let (namespace, rest) = match id.split_once('#') {
            Some(parts) => parts,
            None => return Err(invalid(id)),
        };
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };
        if !valid_part(namespace) || !valid_part(name) {
            return Err(invalid(id));
        }
        if let Some(member) = member {
            if !valid_part(member) {
                return Err(invalid(id));
            }
        }
        Ok(ShapeId {
            namespace: namespace.into(),
            name: name.into(),
            member: member.map(Into::into),
        })
    }
}

impl Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${}", member)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ShapeId({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_absolute() {
        let id: ShapeId = "com.example#Foo$bar".parse().unwrap();
        assert_eq!(id.namespace(), "com.example");
        assert_eq!(id.name(), "Foo");
        assert_eq!(id.member(), Some("bar"));
        assert_eq!(id.to_string(), "com.example#Foo$bar");
        assert_eq!(id.without_member().to_string(), "com.example#Foo");
    }

    #[test]
    fn parse_invalid() {
        for id in ["Foo", "#Foo", "com.example#", "a#b$", "a#b#c"] {
            assert!(id.parse::<ShapeId>().is_err(), "{}", id);
        }
    }

    #[test]
    fn relative_ids() {
        let id = ShapeId::from_optional_namespace(Some("com.example"), "Foo").unwrap();
        assert_eq!(id.to_string(), "com.example#Foo");
        let id = ShapeId::from_optional_namespace(Some("com.example"), "other.ns#Foo").unwrap();
        assert_eq!(id.to_string(), "other.ns#Foo");
        assert!(ShapeId::from_optional_namespace(None, "Foo").is_err());
    }
}
