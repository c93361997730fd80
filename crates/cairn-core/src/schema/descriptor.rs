use super::Cascade;
use crate::stmt::Type;

use heck::ToSnakeCase;
use std::{any::TypeId, fmt};

/// Types that can describe how they map to a table.
pub trait Describe: 'static {
    fn describe() -> Descriptor;
}

/// A handle to a describable type, used to refer to other entities without
/// describing them eagerly.
#[derive(Clone, Copy)]
pub struct TypeRef {
    pub id: TypeId,
    pub name: &'static str,
    describe: fn() -> Descriptor,
}

/// Explicit description of an entity type.
///
/// Members are declared in order. Attribute methods such as
/// [`nullable`](Descriptor::nullable) or [`auto_create`](Descriptor::auto_create)
/// apply to the most recently declared member. Mistakes are recorded and
/// reported when the schema is built.
///
/// ```ignore
/// Descriptor::new::<Cat>()
///     .extends::<Animal>()
///     .column("lives", Type::I64)
///     .reference::<Toy>("favorite")
///     .nullable()
///     .auto_create()
///     .collection::<Toy>("toys")
///     .auto_crud()
/// ```
#[derive(Debug)]
pub struct Descriptor {
    pub(crate) ty: TypeRef,
    pub(crate) table: String,
    pub(crate) key: Option<String>,
    pub(crate) extends: Option<TypeRef>,
    pub(crate) members: Vec<MemberDescriptor>,
    pub(crate) errors: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct MemberDescriptor {
    pub(crate) name: String,
    pub(crate) kind: DeclaredKind,
    pub(crate) column: Option<String>,
    pub(crate) nullable: bool,
    pub(crate) cascade: Cascade,
}

#[derive(Debug)]
pub(crate) enum DeclaredKind {
    Column(Type),
    ForeignKey(TypeRef),
    Reference(TypeRef),
    Collection(TypeRef),
    NotInDb,
}

impl TypeRef {
    pub fn of<T: Describe>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
            describe: T::describe,
        }
    }

    pub fn describe(&self) -> Descriptor {
        (self.describe)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Descriptor {
    /// Starts describing `T`. The table name defaults to the type name in
    /// snake case with an `s` appended.
    pub fn new<T: Describe>() -> Self {
        let ty = TypeRef::of::<T>();

        Self {
            table: format!("{}s", ty.name.to_snake_case()),
            ty,
            key: None,
            extends: None,
            members: vec![],
            errors: vec![],
        }
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = name.into();
        self
    }

    /// Names the integer key member.
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.key = Some(name.into());
        self
    }

    /// Declares that `T` extends `A`. `A`'s members live in `A`'s table and
    /// this type's table shares its key.
    pub fn extends<A: Describe>(mut self) -> Self {
        if self.extends.is_some() {
            self.errors
                .push("only a single `extends` is supported".to_string());
        }
        self.extends = Some(TypeRef::of::<A>());
        self
    }

    /// A scalar column.
    pub fn column(self, name: impl Into<String>, ty: Type) -> Self {
        self.declare(name.into(), DeclaredKind::Column(ty))
    }

    /// An integer column holding the key of a `T` row.
    pub fn foreign_key<T: Describe>(self, name: impl Into<String>) -> Self {
        self.declare(name.into(), DeclaredKind::ForeignKey(TypeRef::of::<T>()))
    }

    /// A reference to a single `T`, stored in a `{name}_id` column.
    pub fn reference<T: Describe>(self, name: impl Into<String>) -> Self {
        self.declare(name.into(), DeclaredKind::Reference(TypeRef::of::<T>()))
    }

    /// A list of `T`, linked through a junction table.
    pub fn collection<T: Describe>(self, name: impl Into<String>) -> Self {
        self.declare(name.into(), DeclaredKind::Collection(TypeRef::of::<T>()))
    }

    /// A member that exists on the type but is never persisted.
    ///
    /// The default `Storable::write_back` rebuilds the item from the saved
    /// record, which resets such members to their defaults after a create or
    /// update. Types that declare one should override `write_back` to carry
    /// the member over.
    pub fn not_in_db(self, name: impl Into<String>) -> Self {
        self.declare(name.into(), DeclaredKind::NotInDb)
    }

    /// The last member may be absent.
    pub fn nullable(self) -> Self {
        self.modify("nullable", |member| match member.kind {
            DeclaredKind::Collection(_) => Err("collections cannot be nullable"),
            _ => {
                member.nullable = true;
                Ok(())
            }
        })
    }

    /// Overrides the column name of the last member.
    pub fn column_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.modify("column_name", |member| match member.kind {
            DeclaredKind::Collection(_) | DeclaredKind::NotInDb => {
                Err("only stored members have a column")
            }
            _ => {
                member.column = Some(name);
                Ok(())
            }
        })
    }

    /// Creating the owner creates the referenced entity first.
    pub fn auto_create(self) -> Self {
        self.cascade("auto_create", |cascade| cascade.create = true)
    }

    /// Updating the owner updates the referenced entity.
    pub fn auto_update(self) -> Self {
        self.cascade("auto_update", |cascade| cascade.update = true)
    }

    /// Deleting the owner deletes the referenced entity.
    pub fn auto_delete(self) -> Self {
        self.cascade("auto_delete", |cascade| cascade.delete = true)
    }

    /// The collection's elements are created, updated and deleted along with
    /// the owner.
    pub fn auto_crud(self) -> Self {
        self.modify("auto_crud", |member| match member.kind {
            DeclaredKind::Collection(_) => {
                member.cascade = Cascade::all();
                Ok(())
            }
            _ => Err("`auto_crud` applies to collections only"),
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.name
    }

    fn declare(mut self, name: String, kind: DeclaredKind) -> Self {
        if let Some(existing) = self.members.iter().find(|member| member.name == name) {
            let message = if existing.kind.label() == kind.label() {
                format!("member `{name}` is declared twice")
            } else {
                format!(
                    "member `{name}` is declared as both a {} and a {}",
                    existing.kind.label(),
                    kind.label()
                )
            };
            self.errors.push(message);
            return self;
        }

        self.members.push(MemberDescriptor {
            name,
            kind,
            column: None,
            nullable: false,
            cascade: Cascade::default(),
        });
        self
    }

    fn cascade(self, attr: &'static str, f: impl FnOnce(&mut Cascade)) -> Self {
        self.modify(attr, |member| match member.kind {
            DeclaredKind::Reference(_) => {
                f(&mut member.cascade);
                Ok(())
            }
            _ => Err("cascading attributes apply to references only"),
        })
    }

    fn modify(
        mut self,
        attr: &'static str,
        f: impl FnOnce(&mut MemberDescriptor) -> Result<(), &'static str>,
    ) -> Self {
        let Some(member) = self.members.last_mut() else {
            self.errors
                .push(format!("`{attr}` must follow a member declaration"));
            return self;
        };

        if let Err(message) = f(member) {
            let message = format!("`{attr}` on `{}`: {message}", member.name);
            self.errors.push(message);
        }
        self
    }
}

impl DeclaredKind {
    fn label(&self) -> &'static str {
        match self {
            DeclaredKind::Column(_) => "column",
            DeclaredKind::ForeignKey(_) => "foreign key",
            DeclaredKind::Reference(_) => "reference",
            DeclaredKind::Collection(_) => "collection",
            DeclaredKind::NotInDb => "non-persisted member",
        }
    }

    pub(crate) fn target(&self) -> Option<&TypeRef> {
        match self {
            DeclaredKind::ForeignKey(ty)
            | DeclaredKind::Reference(ty)
            | DeclaredKind::Collection(ty) => Some(ty),
            _ => None,
        }
    }
}

/// `my_crate::models::Cat` becomes `Cat`.
pub(crate) fn short_type_name(name: &'static str) -> &'static str {
    let end = name.find('<').unwrap_or(name.len());
    match name[..end].rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    }
}
