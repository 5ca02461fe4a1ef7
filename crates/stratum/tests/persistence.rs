mod support;

use pretty_assertions::assert_eq;
use stratum::{
    stmt::QuerySettings,
    ClassSchema, ClassesConfiguration, DomainObject, Event, ObjectRef, PersistenceManager,
    Reflection, Repository, Settings, Value,
};
use support::{
    fixtures::{self, BLOG, BLOG_TABLE, POST, POST_TABLE, TAG},
    Commit, MemoryBackend,
};

fn names(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::name).collect()
}

#[test]
fn persist_all_commits_added_objects() {
    let (pm, backend, events) = fixtures::setup_recording(Settings::default());

    let tag = ObjectRef::empty(TAG);
    tag.set_property("name", "fresh");
    pm.add(&tag);

    assert!(pm.is_new_object(&tag));
    assert!(pm.has_pending_changes());

    pm.persist_all().unwrap();

    assert_eq!(
        backend.commits(),
        [Commit {
            added: vec![(TAG.to_string(), 1000)],
            ..Commit::default()
        }]
    );
    assert!(!pm.is_new_object(&tag));
    assert!(!pm.has_pending_changes());
    assert_eq!(pm.get_identifier_by_object(&tag).as_deref(), Some("1000"));
    assert_eq!(
        pm.get_object_by_identifier("1000", TAG).unwrap(),
        Some(tag.clone())
    );
    assert_eq!(names(&events.borrow()), ["EntityAddedToPersistence"]);
}

#[test]
fn nothing_to_commit() {
    let (pm, backend) = fixtures::setup();
    pm.persist_all().unwrap();
    assert!(backend.commits().is_empty());
}

#[test]
fn removing_an_added_object_forgets_it() {
    let (pm, backend) = fixtures::setup();
    let tag = ObjectRef::empty(TAG);

    pm.add(&tag);
    pm.remove(&tag);
    pm.persist_all().unwrap();

    assert!(backend.commits().is_empty());
}

#[test]
fn dirty_reconstituted_objects_are_updated() {
    let (pm, backend, events) = fixtures::setup_recording(Settings::default());
    let post = pm.get_object_by_identifier("11", POST).unwrap().unwrap();
    let untouched = pm.get_object_by_identifier("12", POST).unwrap().unwrap();
    events.borrow_mut().clear();

    post.set_property("title", "Async Rust");
    assert!(post.borrow().is_dirty("title"));
    assert!(!untouched.borrow().is_any_dirty());

    pm.persist_all().unwrap();

    assert_eq!(backend.commits()[0].changed, [(POST.to_string(), 11)]);
    assert!(!post.borrow().is_any_dirty());
    assert_eq!(names(&events.borrow()), ["EntityUpdatedInPersistence"]);
}

#[test]
fn removed_objects_leave_the_session() {
    let (pm, backend, events) = fixtures::setup_recording(Settings::default());
    let blog = pm.get_object_by_identifier("2", BLOG).unwrap().unwrap();
    events.borrow_mut().clear();

    blog.set_property("title", "Baking");
    pm.update(&blog).unwrap();
    pm.remove(&blog);
    pm.persist_all().unwrap();

    let commit = &backend.commits()[0];
    assert_eq!(commit.removed, [(BLOG.to_string(), 2)]);
    assert!(commit.changed.is_empty());

    assert!(!pm.session().has_object(&blog));
    assert!(!pm.session().is_reconstituted_entity(&blog));
    assert_eq!(names(&events.borrow()), ["EntityRemovedFromPersistence"]);
}

#[test]
fn clear_state_drops_pending_work_and_identities() {
    let (pm, backend) = fixtures::setup();
    let post = pm.get_object_by_identifier("10", POST).unwrap().unwrap();
    pm.add(&ObjectRef::empty(TAG));

    pm.clear_state();

    assert!(!pm.has_pending_changes());
    assert!(pm.session().is_empty());

    backend.clear_ops();
    let reloaded = pm.get_object_by_identifier("10", POST).unwrap().unwrap();
    assert_ne!(reloaded, post);
    assert!(!backend.selects().is_empty());
}

#[test]
fn thawed_objects_dispatch_events() {
    let (pm, _, events) = fixtures::setup_recording(Settings::default());
    let tag_query = pm.create_query_for_type(TAG).unwrap();
    tag_query.execute().to_vec().unwrap();

    let events = events.borrow();
    assert_eq!(names(&events), ["AfterObjectThawed"; 3]);

    let Event::AfterObjectThawed { object, record } = &events[0] else {
        panic!("unexpected event");
    };
    assert_eq!(object.uid(), Some(20));
    assert_eq!(record.get("name"), Some(&Value::from("memory")));
}

#[test]
fn cache_tags_follow_storage_pages() {
    let (pm, _, events) =
        fixtures::setup_recording(Settings::default().storage_pid([1, 7]).cache_tags(true));
    pm.create_query_for_type(POST).unwrap();

    let tags = events
        .borrow()
        .iter()
        .find_map(|event| match event {
            Event::AddCacheTags { tags } => Some(tags.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(tags, [format!("{POST_TABLE}_pid_1"), format!("{POST_TABLE}_pid_7")]);
}

#[test]
fn cache_tags_without_storage_pages_name_the_table() {
    let (pm, _, events) = fixtures::setup_recording(Settings::default().cache_tags(true));
    pm.create_query_for_type(BLOG).unwrap();

    assert!(matches!(
        &events.borrow()[0],
        Event::AddCacheTags { tags } if tags == &[BLOG_TABLE.to_string()]
    ));
}

fn cache_tags(events: &[Event]) -> Vec<Vec<String>> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AddCacheTags { tags } => Some(tags.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn lookup_by_identifier_tags_the_whole_table() {
    let (pm, _, events) =
        fixtures::setup_recording(Settings::default().storage_pid([1]).cache_tags(true));

    let post = pm.get_object_by_identifier("12", POST).unwrap().unwrap();
    assert_eq!(post.uid(), Some(12));

    let tags = cache_tags(&events.borrow());
    assert_eq!(tags[0], [POST_TABLE.to_string()]);
    assert!(tags.iter().flatten().all(|tag| !tag.contains("_pid_")));
}

#[test]
fn repository_default_settings_decide_cache_tags() {
    let (pm, _, events) =
        fixtures::setup_recording(Settings::default().storage_pid([1]).cache_tags(true));

    let mut settings = QuerySettings::default();
    settings.set_respect_storage_page(false);

    let mut repository = Repository::new(&pm, POST);
    repository.set_default_query_settings(settings);
    repository.create_query().unwrap();

    assert_eq!(cache_tags(&events.borrow()), [[POST_TABLE.to_string()]]);
}

#[test]
fn no_cache_tags_unless_enabled() {
    let (pm, _, events) = fixtures::setup_recording(Settings::default().storage_pid([1]));
    pm.create_query_for_type(POST).unwrap();
    assert!(events.borrow().is_empty());
}

#[test]
fn failing_listeners_are_ignored() {
    support::init_logging();
    let backend = MemoryBackend::new();
    fixtures::seed(&backend);

    let pm = PersistenceManager::builder()
        .reflection(fixtures::reflection())
        .tca(fixtures::tca())
        .event_dispatcher(|_: &Event| Err::<(), _>(anyhow::anyhow!("listener failed")))
        .build(backend.clone())
        .unwrap();

    let tag = pm.get_object_by_identifier("20", TAG).unwrap().unwrap();
    tag.set_property("name", "renamed");
    pm.persist_all().unwrap();

    assert_eq!(backend.commits().len(), 1);
}

#[test]
fn unknown_subclasses_are_rejected() {
    let reflection = Reflection::new().with(ClassSchema::entity("Acme\\Shape"));
    let classes = ClassesConfiguration::new().with(
        "Acme\\Shape",
        stratum::config::ClassConfig::default().subclass("circle", "Acme\\Circle"),
    );

    let err = PersistenceManager::builder()
        .reflection(reflection)
        .classes(classes)
        .build(MemoryBackend::new())
        .unwrap_err();

    assert_eq!(err.code(), Some(1476045117));
}

#[test]
fn identifiers_fall_back_to_uids() {
    let (pm, _) = fixtures::setup();

    let mut detached = DomainObject::new(TAG);
    detached.set_uid(77);
    let detached = ObjectRef::new(detached);

    assert_eq!(pm.get_identifier_by_object(&detached).as_deref(), Some("77"));
    assert!(!pm.is_new_object(&detached));
    assert!(pm.is_new_object(&ObjectRef::empty(TAG)));
}
