//! A small blog domain shared by the integration tests.

use super::MemoryBackend;

use serde_json::json;
use stratum::{
    config::{FieldConfig, TableConfig},
    ClassSchema, Event, PersistenceManager, Reflection, Settings, Tca,
};

use std::{cell::RefCell, rc::Rc};

pub const BLOG: &str = "Acme\\Blog\\Domain\\Model\\Blog";
pub const POST: &str = "Acme\\Blog\\Domain\\Model\\Post";
pub const TAG: &str = "Acme\\Blog\\Domain\\Model\\Tag";
pub const PERSON: &str = "Acme\\Blog\\Domain\\Model\\Person";

pub const BLOG_TABLE: &str = "tx_blog_domain_model_blog";
pub const POST_TABLE: &str = "tx_blog_domain_model_post";
pub const TAG_TABLE: &str = "tx_blog_domain_model_tag";
pub const PERSON_TABLE: &str = "tx_blog_domain_model_person";
pub const POST_TAG_MM: &str = "tx_blog_post_tag_mm";

pub fn reflection() -> Reflection {
    Reflection::new()
        .with(
            ClassSchema::entity(BLOG)
                .property("title", "string")
                .property("description", "string")
                .property("posts", format!("ObjectStorage<{POST}>").as_str())
                .lazy_property("administrator", PERSON),
        )
        .with(
            ClassSchema::entity(POST)
                .property("title", "string")
                .property("rating", "int")
                .property("published", "DateTime")
                .property("blog", BLOG)
                .property("tags", format!("ObjectStorage<{TAG}>").as_str())
                .lazy_property("author", PERSON),
        )
        .with(ClassSchema::entity(TAG).property("name", "string"))
        .with(
            ClassSchema::entity(PERSON)
                .property("firstname", "string")
                .property("lastname", "string")
                .transient_property("fullName", "string"),
        )
}

pub fn tca() -> Tca {
    Tca::new()
        .with(
            BLOG_TABLE,
            TableConfig::default()
                .with_column(
                    "posts",
                    FieldConfig {
                        foreign_table: Some(POST_TABLE.to_string()),
                        foreign_field: Some("blog".to_string()),
                        foreign_default_sortby: Some("title DESC".to_string()),
                        maxitems: Some(9999),
                        ..FieldConfig::of_type("inline")
                    },
                )
                .with_column(
                    "administrator",
                    FieldConfig {
                        foreign_table: Some(PERSON_TABLE.to_string()),
                        maxitems: Some(1),
                        ..FieldConfig::of_type("select")
                    },
                ),
        )
        .with(
            POST_TABLE,
            TableConfig::default()
                .with_column(
                    "blog",
                    FieldConfig {
                        foreign_table: Some(BLOG_TABLE.to_string()),
                        maxitems: Some(1),
                        ..FieldConfig::of_type("select")
                    },
                )
                .with_column(
                    "tags",
                    FieldConfig {
                        foreign_table: Some(TAG_TABLE.to_string()),
                        mm: Some(POST_TAG_MM.to_string()),
                        ..FieldConfig::of_type("select")
                    },
                )
                .with_column(
                    "author",
                    FieldConfig {
                        foreign_table: Some(PERSON_TABLE.to_string()),
                        maxitems: Some(1),
                        ..FieldConfig::of_type("select")
                    },
                ),
        )
}

/// Two blogs on page 1 and 2, three posts, three tags and two people.
pub fn seed(backend: &MemoryBackend) {
    backend.insert_all(
        BLOG_TABLE,
        [
            json!({ "uid": 1, "pid": 1, "title": "Rust", "description": "Systems", "posts": 2, "administrator": 1 }),
            json!({ "uid": 2, "pid": 2, "title": "Cooking", "description": "", "posts": 0, "administrator": 0 }),
        ],
    );
    backend.insert_all(
        POST_TABLE,
        [
            json!({ "uid": 10, "pid": 1, "title": "Borrowing", "rating": 4, "published": 1709296200, "blog": 1, "tags": 2, "author": 1 }),
            json!({ "uid": 11, "pid": 1, "title": "Async", "rating": "5", "published": 0, "blog": 1, "tags": 0, "author": 2 }),
            json!({ "uid": 12, "pid": 2, "title": "Bread", "rating": 3, "published": null, "blog": 2, "tags": 1, "author": 0 }),
        ],
    );
    backend.insert_all(
        TAG_TABLE,
        [
            json!({ "uid": 20, "pid": 1, "name": "memory" }),
            json!({ "uid": 21, "pid": 1, "name": "safety" }),
            json!({ "uid": 22, "pid": 2, "name": "baking" }),
        ],
    );
    backend.insert_all(
        POST_TAG_MM,
        [
            json!({ "uid_local": 10, "uid_foreign": 21, "sorting": 2 }),
            json!({ "uid_local": 10, "uid_foreign": 20, "sorting": 1 }),
            json!({ "uid_local": 12, "uid_foreign": 22, "sorting": 1 }),
        ],
    );
    backend.insert_all(
        PERSON_TABLE,
        [
            json!({ "uid": 1, "pid": 1, "firstname": "Ferris", "lastname": "Crab" }),
            json!({ "uid": 2, "pid": 1, "firstname": "Grace", "lastname": "Hopper" }),
        ],
    );
}

/// A persistence manager over a seeded backend.
pub fn setup() -> (PersistenceManager, Rc<MemoryBackend>) {
    setup_with(Settings::default())
}

pub fn setup_with(settings: Settings) -> (PersistenceManager, Rc<MemoryBackend>) {
    super::init_logging();

    let backend = MemoryBackend::new();
    seed(&backend);

    let pm = PersistenceManager::builder()
        .reflection(reflection())
        .tca(tca())
        .settings(settings)
        .build(backend.clone())
        .unwrap();

    (pm, backend)
}

/// Like [`setup_with`], recording the names of dispatched events.
pub fn setup_recording(settings: Settings) -> (PersistenceManager, Rc<MemoryBackend>, Rc<RefCell<Vec<Event>>>) {
    super::init_logging();

    let backend = MemoryBackend::new();
    seed(&backend);

    let events = Rc::new(RefCell::new(vec![]));
    let recorder = events.clone();

    let pm = PersistenceManager::builder()
        .reflection(reflection())
        .tca(tca())
        .settings(settings)
        .event_dispatcher(move |event: &Event| {
            recorder.borrow_mut().push(event.clone());
            Ok::<_, anyhow::Error>(())
        })
        .build(backend.clone())
        .unwrap();

    (pm, backend, events)
}
