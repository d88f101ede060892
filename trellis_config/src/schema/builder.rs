//! Builders for schema descriptors.

use std::fmt;
use std::sync::Arc;

use crate::adapter::{AdapterError, AdapterRegistry};
use crate::cached::{CacheEntry, CachedValue};
use crate::manifest::{ConfigType, DefaultSupplier, ValueManifest};
use crate::path::KeyPath;
use crate::value::Value;

/// Declarative description of a configuration schema.
///
/// # Examples
///
/// ```rust
/// use trellis_config::{Field, Schema};
///
/// let schema = Schema::builder()
///     .field(Field::<String>::new("motd").default(String::from("hello")))
///     .group("database", |g| {
///         g.field(Field::<u16>::new("port").default(5432))
///             .field(Field::<String>::new("host"))
///     })
///     .build();
/// # let _ = schema;
/// ```
#[derive(Default)]
pub struct Schema {
    pub(crate) root: GroupDecl,
}

impl Schema {
    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            root: GroupDecl::default(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("children", &self.root.children.len())
            .finish()
    }
}

/// Builder for the schema's top level.
#[must_use]
pub struct SchemaBuilder {
    root: GroupDecl,
}

impl SchemaBuilder {
    /// Declares a top-level field.
    pub fn field<T: ConfigType>(mut self, field: Field<T>) -> Self {
        self.root.children.push(Node::Field(Box::new(field)));
        self
    }

    /// Declares a named group of fields and sub-groups.
    pub fn group(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(GroupBuilder) -> GroupBuilder,
    ) -> Self {
        let built = configure(GroupBuilder::new(name.into()));
        self.root.children.push(Node::Group(built.decl));
        self
    }

    /// Finalises the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema { root: self.root }
    }
}

/// Builder for a group of fields nested under a path segment.
#[must_use]
pub struct GroupBuilder {
    decl: GroupDecl,
}

impl GroupBuilder {
    fn new(name: String) -> Self {
        Self {
            decl: GroupDecl {
                name: Some(name),
                ..GroupDecl::default()
            },
        }
    }

    /// Declares a field inside this group.
    pub fn field<T: ConfigType>(mut self, field: Field<T>) -> Self {
        self.decl.children.push(Node::Field(Box::new(field)));
        self
    }

    /// Declares a nested sub-group.
    pub fn group(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(Self) -> Self,
    ) -> Self {
        let built = configure(Self::new(name.into()));
        self.decl.children.push(Node::Group(built.decl));
        self
    }

    /// Anchors this group to the document root, discarding the enclosing
    /// groups' accumulated prefix.
    pub fn at_root(mut self) -> Self {
        self.decl.anchored_to_root = true;
        self
    }

    /// Replaces this group's own path segment. The override may be dotted.
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.decl.path_override = Some(path.into());
        self
    }

    /// Header comments attached to this group's section at save time.
    pub fn comments<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.decl.comments = lines.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Default)]
pub(crate) struct GroupDecl {
    pub(crate) name: Option<String>,
    pub(crate) path_override: Option<String>,
    pub(crate) anchored_to_root: bool,
    pub(crate) comments: Vec<String>,
    pub(crate) children: Vec<Node>,
}

pub(crate) enum Node {
    Field(Box<dyn ErasedField>),
    Group(GroupDecl),
}

/// Type-erased view of a field descriptor, letting the walker treat a
/// heterogeneous declaration tree uniformly.
pub(crate) trait ErasedField: Send + Sync {
    fn name(&self) -> &str;
    fn path_override(&self) -> Option<&str>;
    fn anchored_to_root(&self) -> bool;
    fn comments(&self) -> &[String];
    fn instantiate(&self, path: KeyPath) -> Arc<dyn CacheEntry>;
}

/// Descriptor for one declared field of type `T`.
///
/// The declared type drives adapter resolution; an explicit serializer or
/// deserializer on the field overrides the registry for that field only.
pub struct Field<T> {
    name: String,
    path_override: Option<String>,
    anchored_to_root: bool,
    comments: Vec<String>,
    default: Option<DefaultSupplier<T>>,
    serializer: Option<crate::adapter::SerializeFn<T>>,
    deserializer: Option<crate::adapter::DeserializeFn<T>>,
}

impl<T: ConfigType> Field<T> {
    /// Declares a field stored under `name` within its enclosing group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path_override: None,
            anchored_to_root: false,
            comments: Vec::new(),
            default: None,
            serializer: None,
            deserializer: None,
        }
    }

    /// Default value returned (and cached) when the document has no raw
    /// value at the field's path.
    pub fn default(mut self, value: T) -> Self {
        self.default = Some(Arc::new(move || value.clone()));
        self
    }

    /// Lazily-evaluated default supplier.
    pub fn default_with(mut self, supplier: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.default = Some(Arc::new(supplier));
        self
    }

    /// Replaces the field's own path segment. The override may be dotted
    /// and is still resolved relative to the enclosing group.
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path_override = Some(path.into());
        self
    }

    /// Resolves the field's path from the document root, discarding the
    /// enclosing groups' prefix.
    pub fn from_root(mut self) -> Self {
        self.anchored_to_root = true;
        self
    }

    /// Header comments attached to this field at save time.
    pub fn comments<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.comments = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Explicit serializer used for this field instead of the registry.
    pub fn serialize_with(
        mut self,
        serializer: impl Fn(&AdapterRegistry, &T) -> Result<Value, AdapterError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Explicit deserializer used for this field instead of the registry.
    pub fn deserialize_with(
        mut self,
        deserializer: impl Fn(&AdapterRegistry, &Value) -> Result<T, AdapterError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.deserializer = Some(Arc::new(deserializer));
        self
    }
}

impl<T: ConfigType> ErasedField for Field<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn path_override(&self) -> Option<&str> {
        self.path_override.as_deref()
    }

    fn anchored_to_root(&self) -> bool {
        self.anchored_to_root
    }

    fn comments(&self) -> &[String] {
        &self.comments
    }

    fn instantiate(&self, path: KeyPath) -> Arc<dyn CacheEntry> {
        let manifest = Arc::new(ValueManifest::new(
            path,
            self.default.clone(),
            self.serializer.clone(),
            self.deserializer.clone(),
        ));
        Arc::new(CachedValue::new(manifest))
    }
}

impl<T: ConfigType> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("path_override", &self.path_override)
            .field("anchored_to_root", &self.anchored_to_root)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}
