pub mod events;
pub use events::{Event, EventDispatcher};

mod mapper;
pub use mapper::DataMapper;

mod object_access;
pub use object_access::ObjectAccess;

pub mod persistence;
pub use persistence::{PersistenceManager, Settings};

pub mod property;
pub use property::{PropertyMapper, PropertyMappingConfiguration};

pub mod query;
pub use query::{Query, QueryFactory, QueryResult};

mod repository;
pub use repository::Repository;

mod session;
pub use session::Session;

pub mod view;
pub use view::JsonView;

pub use stratum_core::{
    bail, config,
    driver::{self, ChangeSet},
    err,
    schema::{self, Parameter, Type},
    stmt::{self, DomainObject, ObjectRef, Value},
    Backend, ClassSchema, ClassesConfiguration, Error, Reflection, Result, Tca,
};

