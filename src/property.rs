/// A custom `<property>` attached to a map, tileset, tile, layer, object group or object.
///
/// TMX stores every value as text; `kind` is the optional `type` attribute
/// (`string`, `int`, `float`, `bool`, `color`, `file`, `object`, `class`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    /// Property name; not unique within a list.
    pub name: String,
    /// The `type` attribute, if any.
    pub kind: Option<String>,
    /// Raw text value.
    pub value: String,
}

impl Property {
    /// Untyped property.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            kind: None,
            value: value.into(),
        }
    }

    /// The value as written.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// `true`/`1` or `false`/`0`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    /// The value parsed as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }

    /// The value parsed as a float.
    pub fn as_f32(&self) -> Option<f32> {
        self.value.trim().parse().ok()
    }
}

/// Properties in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<Property>);

impl Properties {
    /// An empty list.
    pub fn new() -> Self {
        Properties(Vec::new())
    }

    /// First property called `name`.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Value of the first property called `name`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).map(Property::as_str)
    }

    /// See [`Property::as_bool`].
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Property::as_bool)
    }

    /// See [`Property::as_i64`].
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Property::as_i64)
    }

    /// See [`Property::as_f32`].
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(Property::as_f32)
    }

    /// Properties in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.0.iter()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No properties at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Properties(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Properties {
    type Output = Property;

    fn index(&self, index: usize) -> &Property {
        &self.0[index]
    }
}
