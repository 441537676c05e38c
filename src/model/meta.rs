use serde::{Deserialize, Serialize};

/// Operations the surrounding application layer may gate on entity metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// Static description of one table-backed entity type.
///
/// The flags and role list are advisory: the data-access methods on
/// [`Model`](crate::model::Model) never consult them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Registry name of the entity type.
    pub name: String,
    /// Backing table; defaults to the lower-cased name.
    pub table: String,
    /// Human label; defaults to the name with only its first letter capitalized.
    pub menu: String,
    /// Roles permitted to manage the entity.
    pub allow: Vec<String>,
    /// Columns the application layer lists or edits. Empty means "all".
    #[serde(default)]
    pub fields: Vec<String>,
    pub creatable: bool,
    pub updateable: bool,
    pub deletable: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl EntityMeta {
    /// Defaults derived from the entity name.
    ///
    /// ```rust
    /// use sql_entity::model::EntityMeta;
    ///
    /// let meta = EntityMeta::named("BlogPost");
    /// assert_eq!(meta.table, "blogpost");
    /// assert_eq!(meta.menu, "Blogpost");
    /// assert_eq!(meta.allow, vec!["admin".to_string()]);
    /// ```
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let table = name.to_lowercase();
        let menu = capitalize(&table);
        Self {
            name,
            table,
            menu,
            allow: vec!["admin".to_string()],
            fields: Vec::new(),
            creatable: true,
            updateable: true,
            deletable: true,
            description: None,
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn menu(mut self, menu: impl Into<String>) -> Self {
        self.menu = menu.into();
        self
    }

    #[must_use]
    pub fn allow<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = roles.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn creatable(mut self, creatable: bool) -> Self {
        self.creatable = creatable;
        self
    }

    #[must_use]
    pub fn updateable(mut self, updateable: bool) -> Self {
        self.updateable = updateable;
        self
    }

    #[must_use]
    pub fn deletable(mut self, deletable: bool) -> Self {
        self.deletable = deletable;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether `role` is on the allow-list.
    #[must_use]
    pub fn permits(&self, role: &str) -> bool {
        self.allow.iter().any(|allowed| allowed == role)
    }

    /// Whether the flags allow `op`. Reads are always allowed.
    #[must_use]
    pub fn allows(&self, op: Operation) -> bool {
        match op {
            Operation::Create => self.creatable,
            Operation::Read => true,
            Operation::Update => self.updateable,
            Operation::Delete => self.deletable,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A concrete entity type.
///
/// ```rust
/// use sql_entity::model::{Entity, EntityMeta};
///
/// struct Widgets;
///
/// impl Entity for Widgets {
///     const NAME: &'static str = "Widgets";
///
///     fn meta() -> EntityMeta {
///         EntityMeta::named(Self::NAME).description("Parts in stock")
///     }
/// }
/// ```
pub trait Entity {
    /// Name used for registry lookup and for the table/menu defaults.
    const NAME: &'static str;

    /// Metadata for this entity; override to change the defaults.
    #[must_use]
    fn meta() -> EntityMeta {
        EntityMeta::named(Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_name() {
        let meta = EntityMeta::named("WIDGETS");
        assert_eq!(meta.table, "widgets");
        assert_eq!(meta.menu, "Widgets");
        assert!(meta.creatable && meta.updateable && meta.deletable);
        assert!(meta.permits("admin"));
        assert!(!meta.permits("guest"));
    }

    #[test]
    fn flags_gate_operations() {
        let meta = EntityMeta::named("logs").deletable(false).allow(["admin", "auditor"]);
        assert!(!meta.allows(Operation::Delete));
        assert!(meta.allows(Operation::Read));
        assert!(meta.permits("auditor"));
    }
}
